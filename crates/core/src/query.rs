//! CRM search queries
//!
//! A [`Query`] posts filters, sorts and a property list to one of the
//! `crm/v3/objects/<type>/search` endpoints and decodes the flat v3 result
//! objects through the entity's model.
//!
//! Each [`Query::filter`] call adds one group of filters that must all
//! match. Groups from separate calls are alternatives:
//!
//! ```
//! use hubsync_core::query::{Filter, FilterGroup, QueryData};
//!
//! let single = QueryData::from_groups(vec![FilterGroup::new([
//!     Filter::equals("dealstage", "closedwon"),
//!     Filter::greater("amount", 1000),
//! ])]);
//! assert_eq!(single.filters.len(), 2);
//! assert!(single.filter_groups.is_empty());
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::codec::{self, ResponseLayout};
use crate::error::{Error, Result};
use crate::model::Model;
use crate::page::{Page, PageResponse};
use crate::quota::QuotaGate;
use crate::transport::{JsonObject, Transport};

// ============================================================================
// Request types
// ============================================================================

/// Comparison applied by a [`Filter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operator {
    /// Equal
    Eq,
    /// Not equal
    Neq,
    /// Less than
    Lt,
    /// Less than or equal
    Lte,
    /// Greater than
    Gt,
    /// Greater than or equal
    Gte,
    /// Property has any value
    HasProperty,
    /// Property is unset
    NotHasProperty,
    /// Property contains the token
    ContainsToken,
    /// Property does not contain the token
    NotContainsToken,
}

/// One property condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    /// HubSpot property name
    pub property_name: String,
    /// Comparison to apply
    pub operator: Operator,
    /// Operand; absent for the property-presence operators
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<JsonValue>,
}

impl Filter {
    /// Filter with an explicit operator
    pub fn new(property: impl Into<String>, operator: Operator, value: Option<JsonValue>) -> Self {
        Filter {
            property_name: property.into(),
            operator,
            value,
        }
    }

    fn compare(property: impl Into<String>, operator: Operator, value: impl Into<JsonValue>) -> Self {
        Filter::new(property, operator, Some(value.into()))
    }

    /// Property equals `value`
    pub fn equals(property: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        Filter::compare(property, Operator::Eq, value)
    }

    /// Property does not equal `value`
    pub fn not_equals(property: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        Filter::compare(property, Operator::Neq, value)
    }

    /// `property < value`
    pub fn less(property: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        Filter::compare(property, Operator::Lt, value)
    }

    /// `property <= value`
    pub fn less_equal(property: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        Filter::compare(property, Operator::Lte, value)
    }

    /// `property > value`
    pub fn greater(property: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        Filter::compare(property, Operator::Gt, value)
    }

    /// `property >= value`
    pub fn greater_equal(property: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        Filter::compare(property, Operator::Gte, value)
    }

    /// Property has any value
    pub fn has_property(property: impl Into<String>) -> Self {
        Filter::new(property, Operator::HasProperty, None)
    }

    /// Property is unset
    pub fn not_has_property(property: impl Into<String>) -> Self {
        Filter::new(property, Operator::NotHasProperty, None)
    }

    /// Property contains the word `token`
    pub fn contains_token(property: impl Into<String>, token: impl Into<JsonValue>) -> Self {
        Filter::compare(property, Operator::ContainsToken, token)
    }

    /// Property does not contain the word `token`
    pub fn not_contains_token(property: impl Into<String>, token: impl Into<JsonValue>) -> Self {
        Filter::compare(property, Operator::NotContainsToken, token)
    }
}

/// Filters that must all match
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterGroup {
    /// Conditions that must all match
    pub filters: Vec<Filter>,
}

impl FilterGroup {
    /// Group of conditions that must all match
    pub fn new(filters: impl IntoIterator<Item = Filter>) -> Self {
        FilterGroup {
            filters: filters.into_iter().collect(),
        }
    }
}

/// Sort order of search results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortDirection {
    /// Smallest first
    Ascending,
    /// Largest first
    Descending,
}

/// Sort by one property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sort {
    /// HubSpot property to sort by
    pub property_name: String,
    /// Sort order
    pub direction: SortDirection,
}

/// Body posted to a search endpoint.
///
/// `filters` and `filter_groups` are mutually exclusive; empty members are
/// left out of the JSON.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryData {
    /// Conditions of a single group
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<Filter>,
    /// Alternative groups; any one matching is enough
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filter_groups: Vec<FilterGroup>,
    /// Result ordering
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sorts: Vec<Sort>,
    /// Properties returned per result
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<String>,
    /// Page size
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    /// Cursor from the previous page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
}

impl QueryData {
    /// Body for the given groups; a single group is sent as flat `filters`
    pub fn from_groups(mut groups: Vec<FilterGroup>) -> Self {
        let mut data = QueryData::default();
        if groups.len() == 1 {
            data.filters = groups.remove(0).filters;
        } else {
            data.filter_groups = groups;
        }
        data
    }
}

// ============================================================================
// Query
// ============================================================================

/// Search query against one object type
pub struct Query<E> {
    url: String,
    transport: Arc<dyn Transport>,
    model: Arc<Model<E>>,
    quota: Option<Arc<QuotaGate>>,
    groups: Vec<FilterGroup>,
    sorts: Vec<Sort>,
    properties: Vec<String>,
}

impl<E: Default + 'static> Query<E> {
    /// Query posting to the search endpoint at `url`
    pub fn new(url: impl Into<String>, transport: Arc<dyn Transport>, model: Arc<Model<E>>) -> Self {
        Query {
            url: url.into(),
            transport,
            model,
            quota: None,
            groups: Vec::new(),
            sorts: Vec::new(),
            properties: Vec::new(),
        }
    }

    /// Add a group of filters that must all match
    pub fn filter(mut self, filters: impl IntoIterator<Item = Filter>) -> Self {
        self.groups.push(FilterGroup::new(filters));
        self
    }

    /// Properties to return for each result
    pub fn properties<S: Into<String>>(mut self, properties: impl IntoIterator<Item = S>) -> Self {
        self.properties
            .extend(properties.into_iter().map(Into::into));
        self
    }

    /// Order results by `property`
    pub fn sort(mut self, property: impl Into<String>, direction: SortDirection) -> Self {
        self.sorts.push(Sort {
            property_name: property.into(),
            direction,
        });
        self
    }

    /// Pass every execution through `gate`
    pub fn with_quota(mut self, gate: Arc<QuotaGate>) -> Self {
        self.quota = Some(gate);
        self
    }

    /// Request body for `page`
    pub fn to_request(&self, page: Option<&Page>) -> QueryData {
        let mut data = QueryData::from_groups(self.groups.clone());
        data.sorts = self.sorts.clone();
        data.properties = self.properties.clone();

        if let Some(page) = page {
            if page.count > 0 {
                data.limit = Some(page.count);
            }
            if page.offset != 0 {
                data.after = Some(page.offset.to_string());
            }
        }
        data
    }

    /// Post the query and decode one page of results
    pub fn execute(&self, page: Option<&Page>) -> Result<PageResponse<E>> {
        let body = serde_json::to_value(self.to_request(page))?;

        debug!(
            target: "hubsync::query",
            url = %self.url,
            groups = self.groups.len(),
            after = page.map(|p| p.offset),
            "Executing search"
        );

        let post = || self.transport.post(&self.url, &body, &[]);
        let response = match &self.quota {
            Some(gate) => gate.run(post)?,
            None => post()?,
        };

        match response {
            Some(response) => self.decode(&response),
            None => Ok(PageResponse::empty()),
        }
    }

    fn decode(&self, response: &JsonObject) -> Result<PageResponse<E>> {
        let data = match response.get("results") {
            None => Vec::new(),
            Some(JsonValue::Array(items)) => items
                .iter()
                .map(|item| match item {
                    JsonValue::Object(object) => {
                        Ok(codec::deserialize(&self.model, object, &ResponseLayout::OBJECT))
                    }
                    _ => Err(Error::shape("search result is not an object")),
                })
                .collect::<Result<Vec<E>>>()?,
            Some(_) => return Err(Error::shape("search results is not an array")),
        };

        let after = response
            .get("paging")
            .and_then(|paging| paging.get("next"))
            .and_then(|next| next.get("after"));

        let (offset, has_more) = match after {
            None | Some(JsonValue::Null) => (0, false),
            Some(JsonValue::String(s)) => match s.parse::<i64>() {
                Ok(offset) => (offset, true),
                Err(_) => return Err(Error::shape(format!("non-numeric paging cursor '{}'", s))),
            },
            Some(JsonValue::Number(n)) => match n.as_i64() {
                Some(offset) => (offset, true),
                None => return Err(Error::shape(format!("paging cursor {} out of range", n))),
            },
            Some(_) => return Err(Error::shape("paging cursor is not a string")),
        };

        debug!(
            target: "hubsync::query",
            results = data.len(),
            has_more,
            "Search completed"
        );

        Ok(PageResponse {
            data,
            offset,
            has_more,
        })
    }
}
