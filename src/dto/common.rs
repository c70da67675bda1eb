use serde::Serialize;

pub const DEFAULT_PER_PAGE: i64 = 25;
pub const MAX_PER_PAGE: i64 = 100;
/// Página máxima: el offset debe caber en un i64
pub const MAX_PAGE: i64 = i64::MAX / MAX_PER_PAGE;

// Response genérica
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn success_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
        }
    }
}

/// Página solicitada, ya normalizada
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub per_page: i64,
}

impl PageRequest {
    pub fn new(page: Option<i64>, per_page: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).clamp(1, MAX_PAGE),
            per_page: per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE),
        }
    }

    pub fn limit(&self) -> i64 {
        self.per_page
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.per_page
    }
}

// Response de listados paginados
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, total: i64, page: PageRequest) -> Self {
        let total_pages = if total == 0 {
            0
        } else {
            (total + page.per_page - 1) / page.per_page
        };
        Self {
            data,
            total,
            page: page.page,
            per_page: page.per_page,
            total_pages,
        }
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Paginated<U> {
        Paginated {
            data: self.data.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            per_page: self.per_page,
            total_pages: self.total_pages,
        }
    }
}

/// Patrón ILIKE para búsquedas de texto libre
pub fn search_pattern(search: Option<&str>) -> Option<String> {
    search
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            let escaped = s.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_");
            format!("%{}%", escaped)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_defaults_and_bounds() {
        assert_eq!(PageRequest::new(None, None), PageRequest { page: 1, per_page: 25 });
        assert_eq!(PageRequest::new(Some(0), Some(1000)), PageRequest { page: 1, per_page: 100 });
        let page = PageRequest::new(Some(3), Some(20));
        assert_eq!(page.offset(), 40);
        assert_eq!(page.limit(), 20);

        let huge = PageRequest::new(Some(i64::MAX), Some(i64::MAX));
        assert_eq!(huge.page, MAX_PAGE);
        assert_eq!(huge.per_page, MAX_PER_PAGE);
        assert!(huge.offset() > 0);
        assert_eq!(huge.offset(), (MAX_PAGE - 1) * MAX_PER_PAGE);
    }

    #[test]
    fn test_total_pages() {
        let page = PageRequest::new(Some(1), Some(10));
        assert_eq!(Paginated::<u8>::new(vec![], 0, page).total_pages, 0);
        assert_eq!(Paginated::<u8>::new(vec![], 10, page).total_pages, 1);
        assert_eq!(Paginated::<u8>::new(vec![], 11, page).total_pages, 2);
    }

    #[test]
    fn test_search_pattern_escapes_wildcards() {
        assert_eq!(search_pattern(Some(" rossi ")), Some("%rossi%".to_string()));
        assert_eq!(search_pattern(Some("50%_off")), Some("%50\\%\\_off%".to_string()));
        assert_eq!(search_pattern(Some("   ")), None);
        assert_eq!(search_pattern(None), None);
    }
}
