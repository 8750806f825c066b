//! Typed work items.
//!
//! An `Operation` names one catalog entry and carries exactly the arguments
//! that entry takes, so a heterogeneous batch can be built and checked at
//! compile time instead of pairing callables with loose argument lists.

use crate::catalog::lookup_company_or_absent;
use crate::client::EnrichmentClient;
use crate::error::HarmonicError;
use crate::types::{
    EnrichmentRequest, IdKind, Record, RecordProcessor, SearchArgs, WatchlistUpdate,
};
use std::fmt;
use std::sync::Arc;

/// One remote call and its arguments.
#[derive(Clone)]
pub enum Operation {
    EnrichCompany {
        request: EnrichmentRequest,
    },
    EnrichPerson {
        url: String,
    },
    GetCompanyById {
        id: String,
    },
    /// Company lookup that yields no record instead of a not-found error
    SafeGetCompanyByUrn {
        urn: String,
    },
    GetCompaniesByIds {
        ids: Vec<String>,
        kind: IdKind,
    },
    GetPersonById {
        id: String,
    },
    GetPersonsByIds {
        ids: Vec<String>,
        kind: IdKind,
    },
    Search(SearchArgs),
    GetSavedSearches,
    GetSavedSearchesByOwner,
    GetSavedSearchResults {
        saved_search_id: String,
        processor: Option<RecordProcessor>,
        page_size: u32,
    },
    GetWatchlists,
    GetWatchlistById {
        watchlist_id: String,
    },
    SetWatchlist {
        watchlist_id: String,
        update: WatchlistUpdate,
    },
    DeleteWatchlist {
        watchlist_id: String,
    },
    AddCompanyToWatchlist {
        watchlist_id: String,
        company_ids: Vec<String>,
        kind: IdKind,
    },
    AddCompanyToWatchlistByUrls {
        watchlist_id: String,
        company_urls: Vec<String>,
    },
    RemoveCompanyFromWatchlist {
        watchlist_id: String,
        company_ids: Vec<String>,
        kind: IdKind,
    },
}

impl Operation {
    /// Name of the client method this operation calls.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::EnrichCompany { .. } => "enrich_company",
            Operation::EnrichPerson { .. } => "enrich_person",
            Operation::GetCompanyById { .. } => "get_company_by_id",
            Operation::SafeGetCompanyByUrn { .. } => "safe_get_company_by_urn",
            Operation::GetCompaniesByIds { .. } => "get_companies_by_ids",
            Operation::GetPersonById { .. } => "get_person_by_id",
            Operation::GetPersonsByIds { .. } => "get_persons_by_ids",
            Operation::Search(_) => "search",
            Operation::GetSavedSearches => "get_saved_searches",
            Operation::GetSavedSearchesByOwner => "get_saved_searches_by_owner",
            Operation::GetSavedSearchResults { .. } => "get_saved_search_results",
            Operation::GetWatchlists => "get_watchlists",
            Operation::GetWatchlistById { .. } => "get_watchlist_by_id",
            Operation::SetWatchlist { .. } => "set_watchlist",
            Operation::DeleteWatchlist { .. } => "delete_watchlist",
            Operation::AddCompanyToWatchlist { .. } => "add_company_to_watchlist",
            Operation::AddCompanyToWatchlistByUrls { .. } => "add_company_to_watchlist_by_urls",
            Operation::RemoveCompanyFromWatchlist { .. } => "remove_company_from_watchlist",
        }
    }

    /// Call the client.
    ///
    /// Every operation yields `Some(record)` on success. Only
    /// `SafeGetCompanyByUrn` can yield `None`, for a URN the lookup store
    /// does not know.
    pub async fn execute(
        self,
        client: Arc<dyn EnrichmentClient>,
    ) -> Result<Option<Record>, HarmonicError> {
        let client = &*client;
        let record = match self {
            Operation::EnrichCompany { request } => client.enrich_company(&request).await?,
            Operation::EnrichPerson { url } => client.enrich_person(&url).await?,
            Operation::GetCompanyById { id } => client.get_company_by_id(&id).await?,
            Operation::SafeGetCompanyByUrn { urn } => {
                return lookup_company_or_absent(client, &urn).await;
            }
            Operation::GetCompaniesByIds { ids, kind } => {
                client.get_companies_by_ids(&ids, kind).await?
            }
            Operation::GetPersonById { id } => client.get_person_by_id(&id).await?,
            Operation::GetPersonsByIds { ids, kind } => {
                client.get_persons_by_ids(&ids, kind).await?
            }
            Operation::Search(args) => client.search(&args).await?,
            Operation::GetSavedSearches => client.get_saved_searches().await?,
            Operation::GetSavedSearchesByOwner => client.get_saved_searches_by_owner().await?,
            Operation::GetSavedSearchResults {
                saved_search_id,
                processor,
                page_size,
            } => {
                client
                    .get_saved_search_results(&saved_search_id, processor, page_size)
                    .await?
            }
            Operation::GetWatchlists => client.get_watchlists().await?,
            Operation::GetWatchlistById { watchlist_id } => {
                client.get_watchlist_by_id(&watchlist_id).await?
            }
            Operation::SetWatchlist {
                watchlist_id,
                update,
            } => client.set_watchlist(&watchlist_id, &update).await?,
            Operation::DeleteWatchlist { watchlist_id } => {
                client.delete_watchlist(&watchlist_id).await?
            }
            Operation::AddCompanyToWatchlist {
                watchlist_id,
                company_ids,
                kind,
            } => {
                client
                    .add_company_to_watchlist(&watchlist_id, &company_ids, kind)
                    .await?
            }
            Operation::AddCompanyToWatchlistByUrls {
                watchlist_id,
                company_urls,
            } => {
                client
                    .add_company_to_watchlist_by_urls(&watchlist_id, &company_urls)
                    .await?
            }
            Operation::RemoveCompanyFromWatchlist {
                watchlist_id,
                company_ids,
                kind,
            } => {
                client
                    .remove_company_from_watchlist(&watchlist_id, &company_ids, kind)
                    .await?
            }
        };
        Ok(Some(record))
    }
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::EnrichCompany { request } => {
                f.debug_struct("EnrichCompany").field("request", request).finish()
            }
            Operation::EnrichPerson { url } => f.debug_struct("EnrichPerson").field("url", url).finish(),
            Operation::GetCompanyById { id } => {
                f.debug_struct("GetCompanyById").field("id", id).finish()
            }
            Operation::SafeGetCompanyByUrn { urn } => {
                f.debug_struct("SafeGetCompanyByUrn").field("urn", urn).finish()
            }
            Operation::GetCompaniesByIds { ids, kind } => f
                .debug_struct("GetCompaniesByIds")
                .field("ids", ids)
                .field("kind", kind)
                .finish(),
            Operation::GetPersonById { id } => {
                f.debug_struct("GetPersonById").field("id", id).finish()
            }
            Operation::GetPersonsByIds { ids, kind } => f
                .debug_struct("GetPersonsByIds")
                .field("ids", ids)
                .field("kind", kind)
                .finish(),
            Operation::Search(args) => f.debug_tuple("Search").field(args).finish(),
            Operation::GetSavedSearches => f.write_str("GetSavedSearches"),
            Operation::GetSavedSearchesByOwner => f.write_str("GetSavedSearchesByOwner"),
            Operation::GetSavedSearchResults {
                saved_search_id,
                processor,
                page_size,
            } => f
                .debug_struct("GetSavedSearchResults")
                .field("saved_search_id", saved_search_id)
                .field("processor", &processor.as_ref().map(|_| "<fn>"))
                .field("page_size", page_size)
                .finish(),
            Operation::GetWatchlists => f.write_str("GetWatchlists"),
            Operation::GetWatchlistById { watchlist_id } => f
                .debug_struct("GetWatchlistById")
                .field("watchlist_id", watchlist_id)
                .finish(),
            Operation::SetWatchlist {
                watchlist_id,
                update,
            } => f
                .debug_struct("SetWatchlist")
                .field("watchlist_id", watchlist_id)
                .field("update", update)
                .finish(),
            Operation::DeleteWatchlist { watchlist_id } => f
                .debug_struct("DeleteWatchlist")
                .field("watchlist_id", watchlist_id)
                .finish(),
            Operation::AddCompanyToWatchlist {
                watchlist_id,
                company_ids,
                kind,
            } => f
                .debug_struct("AddCompanyToWatchlist")
                .field("watchlist_id", watchlist_id)
                .field("company_ids", company_ids)
                .field("kind", kind)
                .finish(),
            Operation::AddCompanyToWatchlistByUrls {
                watchlist_id,
                company_urls,
            } => f
                .debug_struct("AddCompanyToWatchlistByUrls")
                .field("watchlist_id", watchlist_id)
                .field("company_urls", company_urls)
                .finish(),
            Operation::RemoveCompanyFromWatchlist {
                watchlist_id,
                company_ids,
                kind,
            } => f
                .debug_struct("RemoveCompanyFromWatchlist")
                .field("watchlist_id", watchlist_id)
                .field("company_ids", company_ids)
                .field("kind", kind)
                .finish(),
        }
    }
}
