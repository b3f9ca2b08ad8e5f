use crate::model::{ShortLinkRequest, ShortLinkResponse};
use shortlink_core::{AllocateParams, Allocator};
use tracing::{info, warn};

/// Runs one allocation and folds the outcome into a response.
///
/// Never fails: every error becomes the response's `error` field.
pub async fn handle_request<A: Allocator + ?Sized>(
    allocator: &A,
    request: ShortLinkRequest,
) -> ShortLinkResponse {
    let ShortLinkRequest {
        url_long,
        url_short,
        cdn_prefix,
    } = request;
    info!(url_long = %url_long, url_short = ?url_short, "long URL to shorten");

    let outcome = allocator
        .allocate(AllocateParams {
            long_url: url_long.clone(),
            short_id: url_short,
            cdn_prefix,
        })
        .await;

    if let Err(err) = &outcome {
        warn!(error = %err, detail = ?err, "short link not created");
    }

    ShortLinkResponse::from_outcome(url_long, outcome)
}
