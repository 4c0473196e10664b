use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};

use crate::auth::claims::TokenKind;
use crate::auth::jwt::{require_kind, verify_token};
use crate::error::AppError;
use crate::extractors::auth_token::AuthToken;
use crate::state::app_state::AppState;

/// Authenticated caller identity, taken from a verified access token.
///
/// Possession of a validly signed, unexpired access token is the sole
/// authorization proof; there is no server-side session lookup. Refresh
/// tokens are rejected here — they only mint new pairs.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub sub: String,
    pub email: String,
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = std::pin::Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let AuthToken { token } =
                AuthToken::from_request(&req, &mut Payload::None).await?;

            let app_state = req
                .app_data::<web::Data<AppState>>()
                .ok_or_else(|| AppError::internal("AppState not available".to_string()))?;

            let claims = verify_token(&token, &app_state.security)?;
            require_kind(&claims, TokenKind::Access)?;

            if claims.sub.is_empty() {
                return Err(AppError::unauthorized());
            }

            Ok(CurrentUser {
                sub: claims.sub,
                email: claims.email,
            })
        })
    }
}
