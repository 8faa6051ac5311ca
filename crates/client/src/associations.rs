//! Associations API (crm-associations v1)
//!
//! Links between CRM objects are addressed by a HubSpot-defined definition
//! id, one per direction.

use std::fmt;
use std::sync::Arc;

use hubsync_core::{JsonValue, Page, PageResponse, Parameter, Result, Transport};
use serde::Serialize;
use tracing::warn;

use crate::response;

const HUBSPOT_DEFINED: &str = "HUBSPOT_DEFINED";

macro_rules! association_types {
    ($($name:ident = $id:literal),* $(,)?) => {
        /// HubSpot-defined association definitions
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum AssociationType {
            $(
                #[doc = concat!("Definition id ", stringify!($id))]
                $name,
            )*
        }

        impl AssociationType {
            /// Every defined association type
            pub const ALL: &'static [AssociationType] = &[$(AssociationType::$name,)*];

            /// Definition id sent to HubSpot
            pub fn definition_id(self) -> u32 {
                match self {
                    $(AssociationType::$name => $id,)*
                }
            }

            /// Look up a type by definition id
            pub fn from_definition_id(id: u32) -> Option<Self> {
                match id {
                    $($id => Some(AssociationType::$name),)*
                    _ => None,
                }
            }
        }
    };
}

association_types! {
    ContactToCompany = 1,
    CompanyToContact = 2,
    DealToContact = 3,
    ContactToDeal = 4,
    DealToCompany = 5,
    CompanyToDeal = 6,
    CompanyToEngagement = 7,
    EngagementToCompany = 8,
    ContactToEngagement = 9,
    EngagementToContact = 10,
    DealToEngagement = 11,
    EngagementToDeal = 12,
    ParentCompanyToChildCompany = 13,
    ChildCompanyToParentCompany = 14,
    ContactToTicket = 15,
    TicketToContact = 16,
    TicketToEngagement = 17,
    EngagementToTicket = 18,
    DealToLineItem = 19,
    LineItemToDeal = 20,
    CompanyToTicket = 25,
    TicketToCompany = 26,
    DealToTicket = 27,
    TicketToDeal = 28,
    AdvisorToCompany = 33,
    CompanyToAdvisor = 34,
    BoardMemberToCompany = 35,
    CompanyToBoardMember = 36,
    ContractorToCompany = 37,
    CompanyToContractor = 38,
    ManagerToCompany = 39,
    CompanyToManager = 40,
    BusinessOwnerToCompany = 41,
    CompanyToBusinessOwner = 42,
    PartnerToCompany = 43,
    CompanyToPartner = 44,
    ResellerToCompany = 45,
    CompanyToReseller = 46,
}

impl fmt::Display for AssociationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} ({})", self, self.definition_id())
    }
}

/// A directed link between two objects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Association {
    /// Source object id
    pub from: i64,
    /// Target object id
    pub to: i64,
    /// Direction and object types of the link
    pub kind: AssociationType,
}

impl Association {
    /// Link `from` to `to` with `kind`
    pub fn new(from: i64, to: i64, kind: AssociationType) -> Self {
        Association { from, to, kind }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AssociationRecord {
    from_object_id: i64,
    to_object_id: i64,
    category: &'static str,
    definition_id: u32,
}

impl From<&Association> for AssociationRecord {
    fn from(a: &Association) -> Self {
        AssociationRecord {
            from_object_id: a.from,
            to_object_id: a.to,
            category: HUBSPOT_DEFINED,
            definition_id: a.kind.definition_id(),
        }
    }
}

fn records(data: &[Association]) -> Result<JsonValue> {
    let records: Vec<AssociationRecord> = data.iter().map(AssociationRecord::from).collect();
    Ok(serde_json::to_value(records)?)
}

/// Access to object associations
pub struct Associations {
    transport: Arc<dyn Transport>,
}

impl Associations {
    /// Associations API over `transport`
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Associations { transport }
    }

    /// Link `from` to `to`
    pub fn create(&self, from: i64, to: i64, kind: AssociationType) -> Result<()> {
        let record = AssociationRecord::from(&Association::new(from, to, kind));
        self.transport.put(
            "crm-associations/v1/associations",
            &serde_json::to_value(record)?,
            &[],
        )?;
        Ok(())
    }

    /// Create many links in one call
    pub fn create_bulk(&self, data: &[Association]) -> Result<()> {
        self.transport.put(
            "crm-associations/v1/associations/create-batch",
            &records(data)?,
            &[],
        )?;
        Ok(())
    }

    /// Ids of objects linked to `object` with `kind`
    pub fn list(
        &self,
        object: i64,
        kind: AssociationType,
        page: Option<&Page>,
    ) -> Result<PageResponse<i64>> {
        let mut params = Vec::new();
        if let Some(page) = page.filter(|p| p.offset > 0) {
            params.push(Parameter::new("offset", page.offset));
        }

        let result = self.transport.get(
            &format!(
                "crm-associations/v1/associations/{}/{}/{}",
                object,
                HUBSPOT_DEFINED,
                kind.definition_id()
            ),
            &params,
        )?;
        let Some(result) = result else {
            return Ok(PageResponse::empty());
        };

        let has_more = response::has_more(&result, "hasMore");
        let data = match result.get("results") {
            Some(JsonValue::Array(ids)) => ids
                .iter()
                .filter_map(|id| {
                    let parsed = id.as_i64();
                    if parsed.is_none() {
                        warn!(target: "hubsync::client", resource = "associations", "Skipping non-integer association id");
                    }
                    parsed
                })
                .collect(),
            _ => Vec::new(),
        };

        Ok(PageResponse {
            data,
            offset: if has_more {
                response::int_of(result.get("offset"))
            } else {
                0
            },
            has_more,
        })
    }

    /// Remove the link from `from` to `to`
    pub fn delete(&self, from: i64, to: i64, kind: AssociationType) -> Result<()> {
        let record = AssociationRecord::from(&Association::new(from, to, kind));
        self.transport.put(
            "crm-associations/v1/associations/delete",
            &serde_json::to_value(record)?,
            &[],
        )?;
        Ok(())
    }

    /// Remove many links in one call
    pub fn delete_bulk(&self, data: &[Association]) -> Result<()> {
        self.transport.put(
            "crm-associations/v1/associations/delete-batch",
            &records(data)?,
            &[],
        )?;
        Ok(())
    }
}
