pub mod centers;
pub mod crops;
pub mod farms;
pub mod health;
pub mod map;
pub mod prices;
pub mod producers;
pub mod routes;
pub mod supplies;
pub mod training;
pub mod transactions;

pub use crate::error::ApiError;

use crate::repository::Page;

/// Clamp client paging to the configured ceiling.
pub fn page(limit: Option<i64>, offset: Option<i64>, max_page_size: i64) -> Page {
    Page {
        limit: limit.unwrap_or(50).clamp(1, max_page_size),
        offset: offset.unwrap_or(0).max(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_clamps_limit_and_offset() {
        let p = page(Some(10_000), Some(-5), 200);
        assert_eq!(p.limit, 200);
        assert_eq!(p.offset, 0);

        let p = page(None, None, 200);
        assert_eq!(p.limit, 50);
        assert_eq!(p.offset, 0);

        let p = page(Some(0), Some(30), 200);
        assert_eq!(p.limit, 1);
        assert_eq!(p.offset, 30);
    }
}
