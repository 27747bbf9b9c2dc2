pub mod security {
    use argon2::{Algorithm, Argon2, Params, PasswordHasher, PasswordVerifier, Version};
    use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};

    use crate::domain::datatype::security::{
        PasswordHash, PasswordHashError, TokenEncryptionError, TokenIssuer, TokenPayload,
    };
    use crate::domain::service::{PasswordHashService, TokenEncryptionService};

    pub struct Argon2HashService(Argon2<'static>);

    impl Argon2HashService {
        pub fn new() -> Self {
            Self(Argon2::new(
                Algorithm::Argon2id,
                Version::V0x13,
                Params::new(
                    Params::DEFAULT_M_COST,
                    Params::DEFAULT_T_COST,
                    Params::DEFAULT_P_COST,
                    Some(Params::DEFAULT_OUTPUT_LEN),
                )
                .expect("Expect valid default Argon2 params"),
            ))
        }
    }

    impl Default for Argon2HashService {
        fn default() -> Self {
            Self::new()
        }
    }

    impl PasswordHashService for Argon2HashService {
        fn hash_password(&self, pwd: &str) -> Result<PasswordHash, PasswordHashError> {
            let salt = password_hash::SaltString::generate(&mut rand_core::OsRng);
            let hash = self.0.hash_password(pwd.as_bytes(), &salt)?;
            Ok(hash.into())
        }

        fn verify_password(&self, pwd: &str, hash: &PasswordHash) -> Result<(), PasswordHashError> {
            let parsed = password_hash::PasswordHash::new(hash.as_str())?;
            self.0.verify_password(pwd.as_bytes(), &parsed)?;
            Ok(())
        }
    }

    pub struct JWTEncryptionService {
        header: Header,
        encoding_key: EncodingKey,
        decoding_key: DecodingKey,
        validation: Validation,
    }

    impl JWTEncryptionService {
        pub fn new(secret: &str) -> Self {
            let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
            validation.set_required_spec_claims(&["exp", "iss", "sub"]);
            validation.set_issuer(&[TokenIssuer::as_str()]);
            validation.leeway = 60;
            validation.validate_exp = true;
            validation.validate_nbf = false;

            Self {
                encoding_key: EncodingKey::from_secret(secret.as_ref()),
                decoding_key: DecodingKey::from_secret(secret.as_ref()),
                header: Header::new(jsonwebtoken::Algorithm::HS256),
                validation,
            }
        }
    }

    impl TokenEncryptionService for JWTEncryptionService {
        fn issue_token(&self, payload: &TokenPayload) -> Result<String, TokenEncryptionError> {
            let token = jsonwebtoken::encode(&self.header, payload, &self.encoding_key)?;
            Ok(token)
        }

        fn verify_token(&self, token: &str) -> Result<TokenPayload, TokenEncryptionError> {
            let token_data =
                jsonwebtoken::decode::<TokenPayload>(token, &self.decoding_key, &self.validation)?;
            Ok(token_data.claims)
        }
    }

    #[cfg(test)]
    mod tests {
        use std::time::Duration;

        use super::*;

        #[test]
        fn hash_then_verify_roundtrip() {
            let service = Argon2HashService::new();
            let hash = service.hash_password("qwerty").unwrap();

            assert!(service.verify_password("qwerty", &hash).is_ok());
            assert!(service.verify_password("dvorak", &hash).is_err());
        }

        #[test]
        fn hashing_twice_salts_differently() {
            let service = Argon2HashService::new();
            let first = service.hash_password("qwerty").unwrap();
            let second = service.hash_password("qwerty").unwrap();

            assert_ne!(first, second);
        }

        #[test]
        fn issued_token_verifies_with_subject() {
            let service = JWTEncryptionService::new("test-secret");
            let payload = TokenPayload::new(Duration::from_secs(60), "a@x.com".into());

            let token = service.issue_token(&payload).unwrap();
            let verified = service.verify_token(&token).unwrap();

            assert_eq!(verified.sub, "a@x.com");
            assert_eq!(verified.iss, TokenIssuer::as_str());
        }

        #[test]
        fn token_signed_with_other_key_is_rejected() {
            let issuer = JWTEncryptionService::new("one-secret");
            let verifier = JWTEncryptionService::new("other-secret");
            let payload = TokenPayload::new(Duration::from_secs(60), "a@x.com".into());

            let token = issuer.issue_token(&payload).unwrap();
            assert!(verifier.verify_token(&token).is_err());
        }
    }
}
