use uuid::Uuid;

/// Returns a short random identifier of `len` lowercase hex characters (capped at 32).
pub fn make_tag(len: usize) -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(len);
    id
}
