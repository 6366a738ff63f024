//! QR image links for badges. The image itself is rendered by the service.

use url::Url;

use accred_core::TicketId;

/// Pixel size requested from the QR service.
const QR_SIZE: &str = "400x400";

/// Builds QR image URLs against a QR rendering service.
#[derive(Debug, Clone)]
pub struct QrLinks {
    base: Url,
}

impl QrLinks {
    /// Links against the service at `base`.
    pub fn new(base: Url) -> Self {
        Self { base }
    }

    /// `{base}?size=400x400&data={ticket}`.
    pub fn image_url(&self, ticket: &TicketId) -> Url {
        let mut url = self.base.clone();
        url.query_pairs_mut()
            .clear()
            .append_pair("size", QR_SIZE)
            .append_pair("data", ticket.as_str());
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_QR_SERVICE_URL;

    #[test]
    fn encodes_ticket_as_data() {
        let links = QrLinks::new(DEFAULT_QR_SERVICE_URL.parse().unwrap());
        let url = links.image_url(&TicketId::normalize("as-2026-0421").unwrap());
        assert_eq!(
            url.as_str(),
            "https://api.qrserver.com/v1/create-qr-code/?size=400x400&data=AS-2026-0421"
        );
    }
}
