/// Authenticated caller, inserted as a request extension by whatever
/// authentication layer fronts the router. Becomes the record's `ownerId`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity(pub String);

impl CallerIdentity {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}
