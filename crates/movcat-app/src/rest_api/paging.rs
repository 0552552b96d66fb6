use crate::error::{ApiError, ApiResult};
use garde::Validate;
use movcat_dal::{Batch, ListingParams, Order};
use serde::Serialize;

/// Pagination query parameters. `page` is 0-based; `sort` is a comma
/// separated list of keys, each optionally prefixed with `+` or `-` for
/// direction.
#[derive(Debug, Clone, Validate, serde::Deserialize)]
#[garde(allow_unvalidated)]
pub struct Paging {
    page: Option<u32>,
    #[garde(range(min = 1, max = 1000))]
    page_size: Option<u32>,
    #[garde(length(max = 255))]
    sort: Option<String>,
}

impl Paging {
    pub fn into_listing_params(self, default_page_size: u32) -> ApiResult<ListingParams> {
        let page = self.page.unwrap_or(0);
        let page_size = self.page_size.unwrap_or(default_page_size);
        let offset = page.checked_mul(page_size).ok_or_else(|| {
            ApiError::InvalidQuery(format!("Page {page} out of addressable range"))
        })?;
        let limit = page_size;
        let order = self
            .sort
            .map(|orderings| {
                orderings
                    .split(',')
                    .map(|name| {
                        let (field_name, descending) = match name.trim() {
                            "" => {
                                return Err(ApiError::InvalidQuery(
                                    "Empty ordering name".to_string(),
                                ));
                            }
                            name if name.len() > 100 => {
                                return Err(ApiError::InvalidQuery(
                                    "Ordering name too long".to_string(),
                                ));
                            }
                            name if name.starts_with('+') => (&name[1..], false),
                            name if name.starts_with('-') => (&name[1..], true),
                            name => (name, false),
                        };

                        let order = if descending {
                            Order::Desc(field_name.to_string())
                        } else {
                            Order::Asc(field_name.to_string())
                        };

                        Ok(order)
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?;

        Ok(ListingParams {
            offset: offset.into(),
            limit: limit.into(),
            order,
        })
    }

    pub fn page_size(&self, default_page_size: u32) -> u32 {
        self.page_size.unwrap_or(default_page_size)
    }
}

/// One page of results. `page` is the 0-based index of this page;
/// `total_pages` is ceil(total / page_size), so an empty listing reports
/// zero pages.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    page: u32,
    page_size: u32,
    total_elements: u64,
    total_pages: u32,
    number_of_elements: u32,
    rows: Vec<T>,
}

impl<T> Page<T>
where
    T: Serialize,
{
    pub fn try_from_batch(
        batch: Batch<T>,
        page_size: u32,
    ) -> Result<Self, std::num::TryFromIntError> {
        Ok(Self {
            page: u32::try_from(batch.offset)? / page_size,
            page_size,
            total_pages: u32::try_from((batch.total + page_size as u64 - 1) / page_size as u64)?,
            total_elements: batch.total,
            number_of_elements: batch.rows.len() as u32,
            rows: batch.rows,
        })
    }

    pub fn from_batch(batch: Batch<T>, page_size: u32) -> Self {
        Self::try_from_batch(batch, page_size).expect("Failed to convert batch to page")
        // As we control the batch, this should never fail
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }
}
