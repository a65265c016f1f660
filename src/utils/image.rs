/// Resolve a server-relative cover path against the server origin.
///
/// The backend stores image paths with platform-native separators, so
/// backslashes are normalized before the join.
pub fn resolve_cover_url(origin: &str, image_path: &str) -> String {
    let normalized = image_path.replace('\\', "/");
    format!(
        "{}/{}",
        origin.trim_end_matches('/'),
        normalized.trim_start_matches('/')
    )
}
