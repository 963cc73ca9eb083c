use super::Error;

/// Error when the engine rejects a catalog query or its result cannot be read.
///
/// Typical causes are missing privileges on the metadata views, a catalog that
/// lacks an expected column (unsupported server version), or a row whose
/// values do not have the expected types.
#[derive(Debug)]
pub(super) struct CatalogQueryError {
    query: Box<str>,
    message: Box<str>,
    inner: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl std::error::Error for CatalogQueryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.inner
            .as_ref()
            .map(|err| err.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl core::fmt::Display for CatalogQueryError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "catalog query `{}` failed: {}", self.query, self.message)
    }
}

impl Error {
    /// Creates a catalog query error for the named query.
    pub fn catalog_query(query: impl Into<String>, message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::CatalogQuery(CatalogQueryError {
            query: query.into().into(),
            message: message.into().into(),
            inner: None,
        }))
    }

    /// Creates a catalog query error wrapping the engine's error.
    pub fn catalog_query_failed(
        query: impl Into<String>,
        err: impl std::error::Error + Send + Sync + 'static,
    ) -> Error {
        Error::from(super::ErrorKind::CatalogQuery(CatalogQueryError {
            query: query.into().into(),
            message: err.to_string().into(),
            inner: Some(Box::new(err)),
        }))
    }

    /// Returns `true` if this error, or any error it was given as context for,
    /// is a catalog query error.
    pub fn is_catalog_query(&self) -> bool {
        self.any_kind(|kind| matches!(kind, super::ErrorKind::CatalogQuery(_)))
    }
}
