//! Username suggestion with a bounded search.

use crate::error::ProfileError;
use crate::reads::get_profile_from_username;
use cw_config::CommunityConfig;
use cw_core::text::limit_string_length;
use rand::Rng;

const MAX_ATTEMPTS: usize = 5;

/// Keep room in the registry's 32-byte identifier for appended letters.
const MAX_BASE_LENGTH: usize = 32 - MAX_ATTEMPTS;

fn random_letter() -> char {
    rand::thread_rng().gen_range(b'a'..=b'z') as char
}

/// Derive an unused username from `base`: lowercase it, strip anything that
/// is not ASCII alphanumeric, then append random letters until the registry
/// has no entry for the candidate. Gives up after a fixed number of
/// attempts rather than searching forever.
pub async fn suggest_username(
    config: &CommunityConfig,
    base: &str,
) -> Result<String, ProfileError> {
    let sanitized: String = base
        .to_lowercase()
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect();
    let mut candidate = limit_string_length(&sanitized, MAX_BASE_LENGTH).to_string();
    if candidate.is_empty() {
        candidate.push(random_letter());
    }

    for _ in 0..MAX_ATTEMPTS {
        if get_profile_from_username(config, &candidate).await.is_none() {
            return Ok(candidate);
        }
        candidate.push(random_letter());
    }
    Err(ProfileError::UsernameUnavailable)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_stay_in_the_lowercase_alphabet() {
        for _ in 0..64 {
            assert!(random_letter().is_ascii_lowercase());
        }
    }
}
