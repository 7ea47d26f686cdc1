//! # Built-in Flag Families
//!
//! Catalog of the flag families shipped with the crate. Each family comes in a
//! boolean (`is_*`) and/or a timestamp (`*_at`) variant.
//!
//! Hook policies are listed per family on purpose: some families treat an
//! undeclared `should_apply_*` hook as "apply the filter", others as "skip it".

use super::definition::{FlagDefinition, FlagVerbs, OverrideHook, Polarity, Representation};
use std::sync::OnceLock;

pub const ACCEPTED_FLAG: &str = "accepted_flag_scope";
pub const ACCEPTED_AT: &str = "accepted_at_scope";
pub const ACTIVE_FLAG: &str = "active_flag_scope";
pub const APPROVED_FLAG: &str = "approved_flag_scope";
pub const APPROVED_AT: &str = "approved_at_scope";
pub const INVITED_FLAG: &str = "invited_flag_scope";
pub const INVITED_AT: &str = "invited_at_scope";
pub const KEPT_FLAG: &str = "kept_flag_scope";
pub const PUBLISHED_FLAG: &str = "published_flag_scope";
pub const PUBLISHED_AT: &str = "published_at_scope";
pub const VERIFIED_FLAG: &str = "verified_flag_scope";
pub const VERIFIED_AT: &str = "verified_at_scope";
pub const ARCHIVED_FLAG: &str = "archived_flag_scope";
pub const ARCHIVED_AT: &str = "archived_at_scope";
pub const CLOSED_FLAG: &str = "closed_flag_scope";
pub const CLOSED_AT: &str = "closed_at_scope";
pub const DRAFTED_FLAG: &str = "drafted_flag_scope";
pub const DRAFTED_AT: &str = "drafted_at_scope";
pub const ENDED_FLAG: &str = "ended_flag_scope";
pub const ENDED_AT: &str = "ended_at_scope";
pub const EXPIRED_FLAG: &str = "expired_flag_scope";
pub const EXPIRED_AT: &str = "expired_at_scope";

#[derive(Clone, Copy)]
enum Hook {
    None,
    OptOut,
    OptIn,
}

struct Family {
    key: &'static str,
    attribute: &'static str,
    representation: Representation,
    polarity: Polarity,
    verbs: [&'static str; 2],
    events: [&'static str; 2],
    predicates: [&'static str; 2],
    hidden_state: &'static str,
    hook: Hook,
}

impl Family {
    fn build(&self) -> FlagDefinition {
        let hook_name = format!("should_apply_{}", self.key);
        let override_hook = match self.hook {
            Hook::None => OverrideHook::None,
            Hook::OptOut => OverrideHook::OptOut(hook_name),
            Hook::OptIn => OverrideHook::OptIn(hook_name),
        };

        FlagDefinition::new(
            self.key,
            self.attribute,
            self.representation,
            self.polarity,
            FlagVerbs::new(self.verbs[0], self.verbs[1])
                .events(self.events[0], self.events[1])
                .predicates(self.predicates[0], self.predicates[1])
                .hidden_state(self.hidden_state),
            override_hook,
        )
    }
}

use Polarity::{Inverse, Normal};
use Representation::{Boolean, NullableTimestamp};

const FAMILIES: &[Family] = &[
    Family {
        key: ACCEPTED_FLAG,
        attribute: "is_accepted",
        representation: Boolean,
        polarity: Normal,
        verbs: ["accept", "reject"],
        events: ["accepted", "rejected"],
        predicates: ["is_accepted", "is_rejected"],
        hidden_state: "rejected",
        hook: Hook::None,
    },
    Family {
        key: ACCEPTED_AT,
        attribute: "accepted_at",
        representation: NullableTimestamp,
        polarity: Normal,
        verbs: ["accept", "reject"],
        events: ["accepted", "rejected"],
        predicates: ["is_accepted", "is_rejected"],
        hidden_state: "rejected",
        hook: Hook::OptOut,
    },
    Family {
        key: ACTIVE_FLAG,
        attribute: "is_active",
        representation: Boolean,
        polarity: Normal,
        verbs: ["activate", "deactivate"],
        events: ["activated", "deactivated"],
        predicates: ["is_active", "is_deactivated"],
        hidden_state: "deactivated",
        hook: Hook::None,
    },
    Family {
        key: APPROVED_FLAG,
        attribute: "is_approved",
        representation: Boolean,
        polarity: Normal,
        verbs: ["approve", "disapprove"],
        events: ["approved", "disapproved"],
        predicates: ["is_approved", "is_disapproved"],
        hidden_state: "disapproved",
        hook: Hook::OptOut,
    },
    Family {
        key: APPROVED_AT,
        attribute: "approved_at",
        representation: NullableTimestamp,
        polarity: Normal,
        verbs: ["approve", "disapprove"],
        events: ["approved", "disapproved"],
        predicates: ["is_approved", "is_disapproved"],
        hidden_state: "disapproved",
        hook: Hook::OptOut,
    },
    Family {
        key: INVITED_FLAG,
        attribute: "is_invited",
        representation: Boolean,
        polarity: Normal,
        verbs: ["invite", "uninvite"],
        events: ["invited", "uninvited"],
        predicates: ["is_invited", "is_not_invited"],
        hidden_state: "uninvited",
        hook: Hook::OptOut,
    },
    Family {
        key: INVITED_AT,
        attribute: "invited_at",
        representation: NullableTimestamp,
        polarity: Normal,
        verbs: ["invite", "uninvite"],
        events: ["invited", "uninvited"],
        predicates: ["is_invited", "is_not_invited"],
        hidden_state: "uninvited",
        hook: Hook::OptOut,
    },
    Family {
        key: KEPT_FLAG,
        attribute: "is_kept",
        representation: Boolean,
        polarity: Normal,
        verbs: ["keep", "unkeep"],
        events: ["kept", "unkept"],
        predicates: ["is_kept", "is_unkept"],
        hidden_state: "unkept",
        hook: Hook::None,
    },
    Family {
        key: PUBLISHED_FLAG,
        attribute: "is_published",
        representation: Boolean,
        polarity: Normal,
        verbs: ["publish", "undo_publish"],
        events: ["published", "unpublished"],
        predicates: ["is_published", "is_unpublished"],
        hidden_state: "not_published",
        hook: Hook::OptOut,
    },
    Family {
        key: PUBLISHED_AT,
        attribute: "published_at",
        representation: NullableTimestamp,
        polarity: Normal,
        verbs: ["publish", "undo_publish"],
        events: ["published", "unpublished"],
        predicates: ["is_published", "is_unpublished"],
        hidden_state: "not_published",
        hook: Hook::OptIn,
    },
    Family {
        key: VERIFIED_FLAG,
        attribute: "is_verified",
        representation: Boolean,
        polarity: Normal,
        verbs: ["verify", "unverify"],
        events: ["verified", "unverified"],
        predicates: ["is_verified", "is_unverified"],
        hidden_state: "unverified",
        hook: Hook::OptOut,
    },
    Family {
        key: VERIFIED_AT,
        attribute: "verified_at",
        representation: NullableTimestamp,
        polarity: Normal,
        verbs: ["verify", "unverify"],
        events: ["verified", "unverified"],
        predicates: ["is_verified", "is_unverified"],
        hidden_state: "unverified",
        hook: Hook::OptOut,
    },
    Family {
        key: ARCHIVED_FLAG,
        attribute: "is_archived",
        representation: Boolean,
        polarity: Inverse,
        verbs: ["archive", "undo_archive"],
        events: ["archived", "unarchived"],
        predicates: ["is_archived", "is_unarchived"],
        hidden_state: "archived",
        hook: Hook::OptIn,
    },
    Family {
        key: ARCHIVED_AT,
        attribute: "archived_at",
        representation: NullableTimestamp,
        polarity: Inverse,
        verbs: ["archive", "unarchive"],
        events: ["archived", "unarchived"],
        predicates: ["is_archived", "is_unarchived"],
        hidden_state: "archived",
        hook: Hook::OptOut,
    },
    Family {
        key: CLOSED_FLAG,
        attribute: "is_closed",
        representation: Boolean,
        polarity: Inverse,
        verbs: ["close", "open"],
        events: ["closed", "opened"],
        predicates: ["is_closed", "is_opened"],
        hidden_state: "closed",
        hook: Hook::OptOut,
    },
    Family {
        key: CLOSED_AT,
        attribute: "closed_at",
        representation: NullableTimestamp,
        polarity: Inverse,
        verbs: ["close", "open"],
        events: ["closed", "opened"],
        predicates: ["is_closed", "is_opened"],
        hidden_state: "closed",
        hook: Hook::OptOut,
    },
    Family {
        key: DRAFTED_FLAG,
        attribute: "is_drafted",
        representation: Boolean,
        polarity: Inverse,
        verbs: ["draft", "undraft"],
        events: ["drafted", "undrafted"],
        predicates: ["is_drafted", "is_undrafted"],
        hidden_state: "drafted",
        hook: Hook::OptOut,
    },
    Family {
        key: DRAFTED_AT,
        attribute: "drafted_at",
        representation: NullableTimestamp,
        polarity: Inverse,
        verbs: ["draft", "undraft"],
        events: ["drafted", "undrafted"],
        predicates: ["is_drafted", "is_undrafted"],
        hidden_state: "drafted",
        hook: Hook::OptOut,
    },
    Family {
        key: ENDED_FLAG,
        attribute: "is_ended",
        representation: Boolean,
        polarity: Inverse,
        verbs: ["end", "undo_end"],
        events: ["ended", "unended"],
        predicates: ["is_ended", "is_unended"],
        hidden_state: "ended",
        hook: Hook::OptIn,
    },
    Family {
        key: ENDED_AT,
        attribute: "ended_at",
        representation: NullableTimestamp,
        polarity: Inverse,
        verbs: ["end", "undo_end"],
        events: ["ended", "unended"],
        predicates: ["is_ended", "is_unended"],
        hidden_state: "ended",
        hook: Hook::OptOut,
    },
    Family {
        key: EXPIRED_FLAG,
        attribute: "is_expired",
        representation: Boolean,
        polarity: Inverse,
        verbs: ["expire", "undo_expire"],
        events: ["expired", "unexpired"],
        predicates: ["is_expired", "is_unexpired"],
        hidden_state: "expired",
        hook: Hook::OptOut,
    },
    Family {
        key: EXPIRED_AT,
        attribute: "expired_at",
        representation: NullableTimestamp,
        polarity: Inverse,
        verbs: ["expire", "undo_expire"],
        events: ["expired", "unexpired"],
        predicates: ["is_expired", "is_unexpired"],
        hidden_state: "expired",
        hook: Hook::OptOut,
    },
];

static CATALOG: OnceLock<Vec<FlagDefinition>> = OnceLock::new();

/// All built-in flag definitions
pub fn all() -> &'static [FlagDefinition] {
    CATALOG.get_or_init(|| FAMILIES.iter().map(Family::build).collect())
}

/// Look up a built-in family by key
pub fn get(key: &str) -> Option<&'static FlagDefinition> {
    all().iter().find(|definition| definition.key == key)
}
