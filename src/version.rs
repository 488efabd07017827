/// Version markers are opaque: anything other than an exact match, including
/// a missing local marker, counts as an update.
pub fn update_available(local: Option<&str>, remote: &str) -> bool {
    local != Some(remote)
}
