//! Paging over ARM list operations.
//!
//! ARM list responses carry a `value` array and an optional `nextLink`
//! holding the absolute URL of the next page. [`Pager`] follows those links
//! one page at a time.

use std::fmt;
use std::marker::PhantomData;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::client::ArmClient;
use crate::error::{ArmError, Result};
use crate::request::ArmRequest;

/// Maximum pages to fetch in [`Pager::collect_all`] (safety limit).
const MAX_PAGES: u32 = 1000;

/// A page of a list operation.
pub trait Paged: DeserializeOwned + Default + Send {
    /// The element type of the page.
    type Item;

    /// Link to the next page, if any.
    fn next_link(&self) -> Option<&str>;

    /// Consume the page, returning its items.
    fn into_items(self) -> Vec<Self::Item>;
}

/// The standard ARM list envelope.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResult<T> {
    /// Items on this page.
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
    /// Link to the next page of results.
    pub next_link: Option<String>,
}

impl<T> Default for ListResult<T> {
    fn default() -> Self {
        Self {
            value: Vec::new(),
            next_link: None,
        }
    }
}

impl<T> ListResult<T> {
    /// Create a page from items and an optional next link.
    pub fn new(value: Vec<T>, next_link: Option<String>) -> Self {
        Self { value, next_link }
    }
}

impl<T: DeserializeOwned + Send> Paged for ListResult<T> {
    type Item = T;

    fn next_link(&self) -> Option<&str> {
        self.next_link.as_deref()
    }

    fn into_items(self) -> Vec<T> {
        self.value
    }
}

/// Iterates over the pages of a list operation.
///
/// Nothing is sent until [`next_page`](Pager::next_page) is called. If the
/// first request could not be built (for example because a path parameter
/// was empty), that error is returned by the first call.
///
/// # Example
///
/// ```ignore
/// let mut pager = client.new_list_pager(None);
/// while pager.more() {
///     let page = pager.next_page().await?;
///     for snapshot in page.value {
///         println!("{:?}", snapshot.name);
///     }
/// }
/// ```
pub struct Pager<T> {
    client: ArmClient,
    first: Option<Result<ArmRequest>>,
    next_link: Option<String>,
    allowed: &'static [u16],
    pages: u32,
    _page: PhantomData<fn() -> T>,
}

impl<T> fmt::Debug for Pager<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pager")
            .field("next_link", &self.next_link)
            .field("pages", &self.pages)
            .finish_non_exhaustive()
    }
}

impl<T: Paged> Pager<T> {
    pub(crate) fn new(
        client: ArmClient,
        first: Result<ArmRequest>,
        allowed: &'static [u16],
    ) -> Self {
        Self {
            client,
            first: Some(first),
            next_link: None,
            allowed,
            pages: 0,
            _page: PhantomData,
        }
    }

    /// Whether another page can be fetched.
    pub fn more(&self) -> bool {
        if self.first.is_some() {
            return true;
        }
        self.next_link.as_deref().is_some_and(|link| !link.is_empty())
    }

    /// Fetch the next page.
    ///
    /// # Errors
    ///
    /// Returns [`ArmError::NoMorePages`] once the last page was returned,
    /// or the error from building, sending or decoding the request.
    ///
    /// A page that fails to send or decode leaves the pager where it was,
    /// so calling `next_page` again retries the same page.
    pub async fn next_page(&mut self) -> Result<T> {
        let request = match self.first.take() {
            Some(Err(e)) => return Err(e),
            Some(Ok(first)) => {
                self.first = Some(Ok(first.clone()));
                first
            }
            None => match self.next_link.as_deref() {
                Some(link) if !link.is_empty() => ArmRequest::new(Method::GET, Url::parse(link)?),
                _ => return Err(ArmError::NoMorePages),
            },
        };

        tracing::debug!(page = self.pages + 1, url = %request.url(), "fetching page");

        let response = self.client.execute(&request, self.allowed).await?;
        let page: T = response.json()?;
        self.first = None;
        self.pages += 1;
        self.next_link = page.next_link().map(str::to_string);
        Ok(page)
    }

    /// Fetch every remaining page and collect the items.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered while fetching pages.
    pub async fn collect_all(mut self) -> Result<Vec<T::Item>> {
        let mut all_items = Vec::new();

        while self.more() {
            let page = self.next_page().await?;
            all_items.extend(page.into_items());

            // Safety limit to prevent infinite loops
            if self.pages >= MAX_PAGES {
                tracing::warn!(
                    "Reached pagination limit of {} pages, stopping",
                    MAX_PAGES
                );
                break;
            }
        }

        Ok(all_items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_result_deserialize() {
        let json = r#"{"value":[1,2,3],"nextLink":"https://management.azure.com/next?$skipToken=abc"}"#;
        let page: ListResult<i32> = serde_json::from_str(json).unwrap();
        assert_eq!(page.value, vec![1, 2, 3]);
        assert_eq!(
            page.next_link(),
            Some("https://management.azure.com/next?$skipToken=abc")
        );
    }

    #[test]
    fn test_list_result_missing_value() {
        let page: ListResult<i32> = serde_json::from_str("{}").unwrap();
        assert!(page.value.is_empty());
        assert!(page.next_link.is_none());
    }

    #[test]
    fn test_list_result_skips_empty_next_link_on_serialize() {
        let page = ListResult::new(vec!["a".to_string()], None);
        let json = serde_json::to_string(&page).unwrap();
        assert_eq!(json, r#"{"value":["a"]}"#);
    }
}
