use async_trait::async_trait;
use reqwest::{Request, Response};

/// Seam between the acquisition chain and the HTTP stack. Auth decorators
/// wrap an inner client; tests substitute canned responders.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
