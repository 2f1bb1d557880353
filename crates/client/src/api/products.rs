//! `/products` endpoints.

use storefront_shared::{
    ApiError, PaginatedResponse, Pagination, Product, ProductCategory, ProductFilters,
};

use super::segment;
use crate::api_client::ApiClient;

/// Listing path with filters and page position encoded as a query string.
pub(crate) fn products_path(filters: &ProductFilters, pagination: &Pagination) -> String {
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in filters.query_pairs() {
        query.append_pair(key, &value);
    }
    query.append_pair("page", &pagination.page.to_string());
    query.append_pair("limit", &pagination.limit.to_string());
    format!("/products?{}", query.finish())
}

impl ApiClient {
    pub async fn get_products(
        &self,
        filters: &ProductFilters,
        pagination: &Pagination,
    ) -> Result<PaginatedResponse<Product>, ApiError> {
        self.get_json(&products_path(filters, pagination)).await
    }

    pub async fn get_product(&self, product_id: &str) -> Result<Product, ApiError> {
        let path = format!("/products/{}", segment(product_id));
        self.get_json(&path).await
    }

    pub async fn get_featured_products(&self) -> Result<Vec<Product>, ApiError> {
        self.get_json("/products/featured").await
    }

    pub async fn get_categories(&self) -> Result<Vec<ProductCategory>, ApiError> {
        self.get_json("/products/categories").await
    }

    pub async fn search_products(&self, query: &str) -> Result<Vec<Product>, ApiError> {
        let path = format!("/products/search?q={}", urlencoding::encode(query));
        self.get_json(&path).await
    }

    pub async fn get_products_by_category(
        &self,
        category_id: &str,
    ) -> Result<Vec<Product>, ApiError> {
        let path = format!("/products/category/{}", segment(category_id));
        self.get_json(&path).await
    }

    pub async fn get_related_products(&self, product_id: &str) -> Result<Vec<Product>, ApiError> {
        let path = format!("/products/{}/related", segment(product_id));
        self.get_json(&path).await
    }
}

#[cfg(test)]
mod tests {
    use storefront_shared::FilterPatch;

    use super::*;

    #[test]
    fn listing_path_encodes_filters_and_page() {
        let mut filters = ProductFilters::default();
        filters.merge(FilterPatch::search("red shoes"));
        let pagination = Pagination {
            page: 2,
            ..Pagination::default()
        };

        let path = products_path(&filters, &pagination);
        assert_eq!(
            path,
            "/products?search=red+shoes&sortBy=createdAt&sortOrder=desc&page=2&limit=12"
        );
    }
}
