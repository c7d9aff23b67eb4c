use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    error::ErrorUnauthorized,
    Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// Cookie set by the login route and checked on every protected request.
pub const ADMIN_COOKIE: &str = "admin-token";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // subject (admin email)
    pub exp: usize,  // expiration time
    pub iat: usize,  // issued at
}

pub fn jwt_secret() -> String {
    std::env::var("JWT_SECRET").unwrap_or_else(|_| "fallback-secret".to_string())
}

pub fn decode_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let key = jwt_secret();

    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.set_required_spec_claims(&["exp", "iat", "sub"]);

    decode::<Claims>(token, &DecodingKey::from_secret(key.as_bytes()), &validation)
        .map(|data| data.claims)
}

pub struct AdminAuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AdminAuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AdminAuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AdminAuthMiddlewareService { service }))
    }
}

pub struct AdminAuthMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AdminAuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // The dashboard sends the cookie; a Bearer header is accepted as
        // well so the API can be exercised from curl and scripts.
        let token = req
            .cookie(ADMIN_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .or_else(|| {
                req.headers()
                    .get("Authorization")
                    .and_then(|header| header.to_str().ok())
                    .and_then(|value| value.strip_prefix("Bearer "))
                    .map(|token| token.to_string())
            });

        if let Some(token) = token {
            match decode_token(&token) {
                Ok(claims) => {
                    req.extensions_mut().insert(claims);
                    return Box::pin(self.service.call(req));
                }
                Err(err) => {
                    println!("Error decoding token: {:?}", err);
                    return Box::pin(ready(Err(ErrorUnauthorized("Invalid token"))));
                }
            }
        }
        Box::pin(ready(Err(ErrorUnauthorized("Not authenticated"))))
    }
}
