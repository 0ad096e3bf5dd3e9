//! Dashboard aggregates computed over a user's contact set.
//!
//! Pure read-side projection: nothing here is stored, the stats are
//! recomputed from the contact rows on every request.

use serde::Serialize;

use crate::models::Contact;

const TOP_FIRMS_LIMIT: usize = 5;
const RECENT_CONTACTS_LIMIT: usize = 5;

/// Aggregate statistics for the dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_contacts: u32,
    pub reached_out: u32,
    pub responded: u32,
    /// responded / reached_out as a percentage, one decimal place.
    /// Defined as 0 when nobody has been reached out to yet.
    pub response_rate: f64,
    pub top_firms: Vec<FirmCount>,
    pub recent_contacts: Vec<RecentContact>,
}

/// Contact count for a single firm.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FirmCount {
    pub name: String,
    pub count: u32,
}

/// Compact projection of a recently added contact.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentContact {
    pub id: String,
    pub name: String,
    pub firm: Option<String>,
    /// Role, falling back to job title when no role is set.
    pub role: Option<String>,
    pub reached_out: bool,
    pub responded: bool,
}

impl DashboardStats {
    /// Compute stats from the user's full contact set.
    ///
    /// `contacts` must be ordered oldest-created first: top-firm ties are
    /// broken by the order in which a firm was first encountered, and the
    /// recent list is taken from the tail.
    pub fn compute(contacts: &[Contact]) -> Self {
        let total_contacts = contacts.len() as u32;
        let reached_out = contacts.iter().filter(|c| c.reached_out).count() as u32;
        let responded = contacts.iter().filter(|c| c.responded).count() as u32;

        let response_rate = if reached_out > 0 {
            (responded as f64 / reached_out as f64 * 1000.0).round() / 10.0
        } else {
            0.0
        };

        let recent_contacts = contacts
            .iter()
            .rev()
            .take(RECENT_CONTACTS_LIMIT)
            .map(|c| RecentContact {
                id: c.id.clone(),
                name: c.full_name.clone(),
                firm: c.firm.clone(),
                role: c.role.clone().or_else(|| c.job_title.clone()),
                reached_out: c.reached_out,
                responded: c.responded,
            })
            .collect();

        Self {
            total_contacts,
            reached_out,
            responded,
            response_rate,
            top_firms: top_firms(contacts.iter().map(|c| c.firm.as_deref())),
            recent_contacts,
        }
    }
}

/// Count contacts per firm and return the top firms by count.
///
/// Firms are accumulated in first-encounter order and the sort is stable,
/// so equal counts keep that order. Contacts without a firm are skipped.
fn top_firms<'a>(firms: impl Iterator<Item = Option<&'a str>>) -> Vec<FirmCount> {
    let mut counts: Vec<FirmCount> = Vec::new();

    for firm in firms.flatten() {
        match counts.iter_mut().find(|f| f.name == firm) {
            Some(entry) => entry.count += 1,
            None => counts.push(FirmCount {
                name: firm.to_string(),
                count: 1,
            }),
        }
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(TOP_FIRMS_LIMIT);
    counts
}
