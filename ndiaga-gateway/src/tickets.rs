use crate::client::ApiClient;
use ndiaga_core::ClientResult;
use ndiaga_shared::TicketId;
use serde::Serialize;

#[derive(Serialize)]
struct BoardTicketBody<'a> {
    #[serde(rename = "ticketId")]
    ticket_id: &'a str,
}

impl ApiClient {
    /// URL of the printable ticket, opened in a new tab by the confirmation
    /// page. No call is made here; the PDF endpoint streams on demand.
    pub fn ticket_pdf_url(&self, ticket_id: &TicketId) -> String {
        self.url(&format!("/tickets/{}/pdf", ticket_id))
    }

    /// Mark a scanned ticket as boarded. Used by the verification scanner
    /// after a successful scan; the response body carries nothing of use.
    pub async fn board_ticket(&self, ticket_id: &TicketId) -> ClientResult<()> {
        self.post_no_content(
            "/tickets/board",
            &BoardTicketBody {
                ticket_id: ticket_id.as_str(),
            },
            None,
        )
        .await
    }
}
