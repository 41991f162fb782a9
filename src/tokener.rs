use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::Error;

pub trait TokenPayload: Serialize + for<'d> Deserialize<'d> {
    fn user(&self) -> &str;
}

pub trait Tokener<P: TokenPayload> {
    fn gen_token(&self, payload: &P) -> Result<String, Error>;
    fn verify_token(&self, token: &str) -> Result<P, Error>;
}

pub struct JWT {
    secret: Vec<u8>,
}

impl JWT {
    pub fn new(secret: Vec<u8>) -> Self {
        Self { secret }
    }
}

impl<P> Tokener<P> for JWT
where
    P: TokenPayload,
{
    fn gen_token(&self, payload: &P) -> Result<String, Error> {
        let header = Header::new(Algorithm::HS256);
        let key = EncodingKey::from_secret(&self.secret);
        let token = encode(&header, payload, &key)?;
        Ok(token)
    }

    fn verify_token(&self, token: &str) -> Result<P, Error> {
        let key = DecodingKey::from_secret(&self.secret);
        let validation = Validation::new(Algorithm::HS256);
        let payload = decode(token, &key, &validation)?;
        Ok(payload.claims)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Deserialize, Serialize)]
    struct Claim {
        user: String,
        exp: i64,
    }

    impl TokenPayload for Claim {
        fn user(&self) -> &str {
            &self.user
        }
    }

    fn claim(user: &str) -> Claim {
        Claim {
            user: user.into(),
            exp: chrono::offset::Utc::now().timestamp() + 3600,
        }
    }

    #[test]
    fn test_gen_and_verify_token() {
        let jwt = JWT::new(vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 0]);
        let token = jwt.gen_token(&claim("bear dad")).unwrap();
        let verified: Claim = jwt.verify_token(&token).unwrap();
        assert_eq!(verified.user, "bear dad");
    }

    #[test]
    fn test_different_tokens() {
        let jwt = JWT::new(vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 0]);
        let token_a = jwt.gen_token(&claim("a")).unwrap();
        let token_b = jwt.gen_token(&claim("b")).unwrap();
        let verified_a: Claim = jwt.verify_token(&token_a).unwrap();
        let verified_b: Claim = jwt.verify_token(&token_b).unwrap();
        assert_eq!(verified_a.user, "a");
        assert_eq!(verified_b.user, "b");
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let jwt = JWT::new(vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 0]);
        let other = JWT::new(vec![9, 9, 9, 9]);
        let token = jwt.gen_token(&claim("a")).unwrap();
        assert!(<JWT as Tokener<Claim>>::verify_token(&other, &token).is_err());
    }
}
