use std::collections::HashMap;

/// Nested lookup table keyed by small numeric codes.
pub type CodeTable = HashMap<u8, HashMap<String, String>>;

/// Finds the outer key whose inner map holds `value`. When several do, which
/// one is returned is unspecified.
pub fn get_key_from_value(table: &CodeTable, value: &str) -> Option<u8> {
    table
        .iter()
        .find(|(_, inner)| inner.values().any(|v| v == value))
        .map(|(key, _)| *key)
}

pub fn uint8_map_keys(table: &CodeTable) -> Vec<u8> {
    table.keys().copied().collect()
}

/// Sorts in place, ascending, and hands the slice back.
pub fn sort_uint8_slice(values: &mut [u8]) -> &mut [u8] {
    values.sort_unstable();
    values
}

pub fn sorted_uint8_map_keys(table: &CodeTable) -> Vec<u8> {
    let mut keys = uint8_map_keys(table);
    sort_uint8_slice(&mut keys);
    keys
}

pub fn string_in_slice(needle: &str, list: &[String]) -> bool {
    list.iter().any(|item| item == needle)
}
