use flag_scopes::flag::families;
use proptest::prelude::*;

/// Strategy picking any built-in family key
pub fn family_key_strategy() -> impl Strategy<Value = String> {
    let keys: Vec<String> = families::all().iter().map(|f| f.key.clone()).collect();
    prop::sample::select(keys)
}

/// Strategy for (rows with flag on, rows with flag off)
pub fn population_strategy() -> impl Strategy<Value = (usize, usize)> {
    (0usize..8, 0usize..8)
}
