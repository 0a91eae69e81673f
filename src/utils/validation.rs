use crate::error::AppError;
use crate::models::RecommendRequest;

const MAX_GAME_NAMES: usize = 10_000;
const MAX_NAME_LENGTH: usize = 512;
const MAX_USER_ID_LENGTH: usize = 128;

/// Bounds checks on the request body. An empty library is not rejected
/// here; it simply matches nothing in the catalog downstream.
pub fn validate_recommend_request(request: &RecommendRequest) -> Result<(), AppError> {
    if request.game_names.len() > MAX_GAME_NAMES {
        return Err(AppError::InvalidInput(format!(
            "Too many game names: {} (max {})",
            request.game_names.len(),
            MAX_GAME_NAMES
        )));
    }

    for name in &request.game_names {
        if name.len() > MAX_NAME_LENGTH {
            return Err(AppError::InvalidInput(format!(
                "Game name too long (max {} bytes)",
                MAX_NAME_LENGTH
            )));
        }
    }

    if let Some(user_id) = &request.user_id {
        if user_id.len() > MAX_USER_ID_LENGTH {
            return Err(AppError::InvalidInput(format!(
                "User id too long (max {} bytes)",
                MAX_USER_ID_LENGTH
            )));
        }
    }

    Ok(())
}
