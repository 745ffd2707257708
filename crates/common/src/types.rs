//! Tipos comuns do domínio

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

/// ID de loja (chave primária em `lojas`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From)]
#[display("{_0}")]
pub struct StoreId(pub i32);

impl StoreId {
    pub fn from_string(s: &str) -> Result<Self, std::num::ParseIntError> {
        Ok(Self(s.parse()?))
    }
}

/// ID de usuário (chave primária em `usuarios`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From)]
#[display("{_0}")]
pub struct UserId(pub i32);

impl UserId {
    pub fn from_string(s: &str) -> Result<Self, std::num::ParseIntError> {
        Ok(Self(s.parse()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_id_from_string() {
        assert_eq!(StoreId::from_string("42").unwrap(), StoreId(42));
        assert!(StoreId::from_string("abc").is_err());
    }

    #[test]
    fn test_user_id_display() {
        assert_eq!(UserId(7).to_string(), "7");
    }
}
