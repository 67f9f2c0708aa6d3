//! Endpoint URL builders
//!
//! Initial request URLs for each public pull. Follow-up pages are built by
//! the paginator from [`resource_base`].

use crate::pagination::PAGE_SIZE;
use crate::records::Resource;

/// `{base_url}{resource path}`, the base path cursors are appended to
pub fn resource_base(base_url: &str, resource: Resource) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), resource.path())
}

/// Which subscriptions to pull
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubscriptionQuery {
    /// Every subscription
    #[default]
    All,
    /// `status=active`
    Active,
    /// `status=cancelled`, optionally narrowed by creation date
    Cancelled {
        start_date: Option<String>,
        end_date: Option<String>,
    },
}

impl SubscriptionQuery {
    /// Cancelled subscriptions; empty dates count as unset
    pub fn cancelled(start_date: impl Into<String>, end_date: impl Into<String>) -> Self {
        let non_empty = |s: String| (!s.is_empty()).then_some(s);
        Self::Cancelled {
            start_date: non_empty(start_date.into()),
            end_date: non_empty(end_date.into()),
        }
    }

    /// Status filter sent upstream
    pub fn status(&self) -> Option<&'static str> {
        match self {
            Self::All => None,
            Self::Active => Some("active"),
            Self::Cancelled { .. } => Some("cancelled"),
        }
    }

    /// Initial request URL
    ///
    /// The creation-date window is only applied when both ends are given;
    /// a single date leaves the URL unfiltered.
    pub fn url(&self, base_url: &str) -> String {
        let mut url = format!(
            "{}?limit={PAGE_SIZE}",
            resource_base(base_url, Resource::Subscriptions)
        );
        if let Some(status) = self.status() {
            url.push_str(&format!("&status={status}"));
        }
        if let Self::Cancelled {
            start_date: Some(start),
            end_date: Some(end),
        } = self
        {
            url.push_str(&format!("&created_at_min={start}&created_at_max={end}"));
        }
        url
    }
}

/// Which orders to pull
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OrderQuery {
    /// Every order
    #[default]
    All,
    /// Processed orders with the given ids
    ByIds(Vec<String>),
}

impl OrderQuery {
    /// Initial request URL
    pub fn url(&self, base_url: &str) -> String {
        let base = resource_base(base_url, Resource::Orders);
        match self {
            Self::All => format!("{base}?limit={PAGE_SIZE}"),
            Self::ByIds(ids) => {
                format!("{base}?limit={PAGE_SIZE}&status=success&ids={}", ids.join(","))
            }
        }
    }
}

#[cfg(test)]
mod tests;
