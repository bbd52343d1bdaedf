use std::collections::HashMap;

/// GitHub user id → Slack display name, loaded once at startup and never
/// mutated afterwards.
pub(crate) type IdentityMap = HashMap<u64, String>;

/// Returns the Slack mention token for a GitHub user. Unmapped users get a
/// channel-wide `<!channel>` so the notice stays actionable.
pub(crate) fn mention_for(users: &IdentityMap, github_user_id: u64) -> String {
    match users.get(&github_user_id) {
        Some(name) => format!("<@{}>", name),
        None => "<!channel>".to_owned(),
    }
}
