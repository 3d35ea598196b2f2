use crate::error::RpcError;
use std::fmt;

/// 원격 메서드 주소: `/{service}/{method}`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodPath {
    service: String,
    method: String,
}

impl MethodPath {
    pub fn new(service: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            method: method.into(),
        }
    }

    /// 선행 `/` 하나와 비어 있지 않은 세그먼트 두 개만 허용
    pub fn parse(path: &str) -> Result<Self, RpcError> {
        let malformed = || RpcError::MalformedPath(path.to_string());
        let rest = path.strip_prefix('/').ok_or_else(malformed)?;
        let mut segments = rest.split('/');
        match (segments.next(), segments.next(), segments.next()) {
            (Some(service), Some(method), None) if !service.is_empty() && !method.is_empty() => {
                Ok(Self::new(service, method))
            }
            _ => Err(malformed()),
        }
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn method(&self) -> &str {
        &self.method
    }
}

impl fmt::Display for MethodPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.service, self.method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_canonical_path() {
        let path = MethodPath::parse("/auction.AuctionCatalog/Execute").unwrap();
        assert_eq!(path.service(), "auction.AuctionCatalog");
        assert_eq!(path.method(), "Execute");
        assert_eq!(path.to_string(), "/auction.AuctionCatalog/Execute");
    }

    #[test]
    fn rejects_other_shapes() {
        for bad in [
            "",
            "/",
            "auction.AuctionCatalog/Execute",
            "/auction.AuctionCatalog",
            "/auction.AuctionCatalog/",
            "//Execute",
            "/a/b/c",
            "/a/b/",
        ] {
            assert!(
                matches!(MethodPath::parse(bad), Err(RpcError::MalformedPath(_))),
                "{bad:?} should not parse"
            );
        }
    }
}
