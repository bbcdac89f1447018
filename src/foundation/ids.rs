use uuid::Uuid;

const SUFFIX_LEN: usize = 9;

/// Generate a fresh identifier of the form `"{prefix}_{millis}_{suffix}"`.
///
/// `suffix` is the first nine hex digits of a v4 UUID.
pub fn fresh_id(prefix: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let uuid = Uuid::new_v4().simple().to_string();
    format!("{prefix}_{millis}_{}", &uuid[..SUFFIX_LEN])
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/ids.rs"]
mod tests;
