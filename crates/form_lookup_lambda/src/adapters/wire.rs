//! Response shapes of the two HubSpot endpoints the lookup reads.

use form_lookup_core::{Engagement, TableRow};
use serde::Deserialize;

/// One page of `/engagements/v1/engagements/associated/CONTACT/{id}/paged`.
#[derive(Debug, Deserialize)]
pub struct EngagementsPage {
    #[serde(default)]
    pub results: Option<Vec<EngagementRecord>>,
    #[serde(rename = "hasMore", default)]
    pub has_more: bool,
}

/// The v1 API nests the engagement header under `engagement`; the flat
/// `{ id, type }` form is accepted as well.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum EngagementRecord {
    Nested { engagement: Engagement },
    Flat(Engagement),
}

impl From<EngagementRecord> for Engagement {
    fn from(record: EngagementRecord) -> Self {
        match record {
            EngagementRecord::Nested { engagement } => engagement,
            EngagementRecord::Flat(engagement) => engagement,
        }
    }
}

/// `/cms/v3/hubdb/tables/{tableId}/rows`.
#[derive(Debug, Deserialize)]
pub struct TableRowsPage {
    #[serde(default)]
    pub results: Vec<TableRow>,
    #[serde(default)]
    pub total: Option<u64>,
}

pub fn parse_engagements_page(page: EngagementsPage) -> Option<Vec<Engagement>> {
    if page.has_more {
        tracing::warn!(
            component = "hubspot_client",
            event = "engagements_truncated",
            "only the first engagements page is read"
        );
    }

    page.results
        .map(|records| records.into_iter().map(Engagement::from).collect())
}

pub fn parse_table_rows_page(page: TableRowsPage) -> Vec<TableRow> {
    if let Some(total) = page.total {
        if total > page.results.len() as u64 {
            tracing::warn!(
                component = "hubspot_client",
                event = "hubdb_rows_truncated",
                total,
                returned = page.results.len(),
                "only the first hubdb rows page is read"
            );
        }
    }
    page.results
}
