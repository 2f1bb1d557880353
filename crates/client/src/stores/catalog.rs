//! Product catalog store: listings, filters, pagination and the product
//! currently being viewed.
//!
//! A single `is_loading`/`error` pair is shared by every request; whichever
//! settles last decides what they show.

use storefront_shared::{
    ApiError, FilterPatch, PaginatedResponse, Pagination, Product, ProductCategory, ProductFilters,
};
use tokio::sync::watch;

use super::{Reducer, Store};
use crate::api_client::ApiClient;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogState {
    pub products: Vec<Product>,
    pub featured_products: Vec<Product>,
    pub related_products: Vec<Product>,
    pub current_product: Option<Product>,
    pub categories: Vec<ProductCategory>,
    pub filters: ProductFilters,
    pub pagination: Pagination,
    pub is_loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CatalogAction {
    ClearError,
    SetFilters(FilterPatch),
    ClearFilters,
    SetPage(u32),
    ClearCurrentProduct,
    /// A request started. Only listing and detail requests show as loading.
    Started { tracks_loading: bool },
    Failed {
        message: String,
        tracks_loading: bool,
    },
    ProductsLoaded(PaginatedResponse<Product>),
    /// Search or category results; pagination is left alone.
    ResultsLoaded(Vec<Product>),
    ProductLoaded(Product),
    FeaturedLoaded(Vec<Product>),
    RelatedLoaded(Vec<Product>),
    CategoriesLoaded(Vec<ProductCategory>),
}

impl Reducer for CatalogState {
    type Action = CatalogAction;

    fn reduce(&mut self, action: CatalogAction) {
        match action {
            CatalogAction::ClearError => self.error = None,
            CatalogAction::SetFilters(patch) => {
                self.filters.merge(patch);
                self.pagination.page = 1;
            }
            CatalogAction::ClearFilters => {
                self.filters = ProductFilters::default();
                self.pagination.page = 1;
            }
            CatalogAction::SetPage(page) => self.pagination.page = page.max(1),
            CatalogAction::ClearCurrentProduct => self.current_product = None,
            CatalogAction::Started { tracks_loading } => {
                if tracks_loading {
                    self.is_loading = true;
                }
                self.error = None;
            }
            CatalogAction::Failed {
                message,
                tracks_loading,
            } => {
                if tracks_loading {
                    self.is_loading = false;
                }
                self.error = Some(message);
            }
            CatalogAction::ProductsLoaded(page) => {
                self.is_loading = false;
                self.products = page.data;
                self.pagination = page.pagination;
            }
            CatalogAction::ResultsLoaded(products) => {
                self.is_loading = false;
                self.products = products;
            }
            CatalogAction::ProductLoaded(product) => {
                self.is_loading = false;
                self.current_product = Some(product);
            }
            CatalogAction::FeaturedLoaded(products) => self.featured_products = products,
            CatalogAction::RelatedLoaded(products) => self.related_products = products,
            CatalogAction::CategoriesLoaded(categories) => self.categories = categories,
        }
    }
}

#[derive(Clone)]
pub struct CatalogStore {
    store: Store<CatalogState>,
    api: ApiClient,
}

impl CatalogStore {
    pub fn new(api: ApiClient) -> Self {
        Self {
            store: Store::new(CatalogState::default()),
            api,
        }
    }

    pub fn snapshot(&self) -> CatalogState {
        self.store.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<CatalogState> {
        self.store.subscribe()
    }

    pub fn dispatch(&self, action: CatalogAction) {
        self.store.dispatch(action);
    }

    pub fn filters(&self) -> ProductFilters {
        self.store.read(|s| s.filters.clone())
    }

    pub fn pagination(&self) -> Pagination {
        self.store.read(|s| s.pagination)
    }

    pub fn set_filters(&self, patch: FilterPatch) {
        self.store.dispatch(CatalogAction::SetFilters(patch));
    }

    pub fn clear_filters(&self) {
        self.store.dispatch(CatalogAction::ClearFilters);
    }

    pub fn set_page(&self, page: u32) {
        self.store.dispatch(CatalogAction::SetPage(page));
    }

    pub fn clear_current_product(&self) {
        self.store.dispatch(CatalogAction::ClearCurrentProduct);
    }

    pub fn clear_error(&self) {
        self.store.dispatch(CatalogAction::ClearError);
    }

    /// Apply `patch` (if it changes anything) and load the matching page.
    ///
    /// A non-empty patch goes through `set_filters`, so the request is for
    /// page 1. The response's pagination block replaces the local one.
    pub async fn fetch_products(&self, patch: FilterPatch) -> Result<Vec<Product>, ApiError> {
        if !patch.is_empty() {
            self.set_filters(patch);
        }
        let (filters, pagination) = self.store.read(|s| (s.filters.clone(), s.pagination));

        self.start(true);
        match self.api.get_products(&filters, &pagination).await {
            Ok(page) => {
                let products = page.data.clone();
                self.store.dispatch(CatalogAction::ProductsLoaded(page));
                Ok(products)
            }
            Err(e) => {
                self.fail(&e, "Failed to fetch products", true);
                Err(e)
            }
        }
    }

    /// Move to `page` with the current filters and load it.
    pub async fn fetch_page(&self, page: u32) -> Result<Vec<Product>, ApiError> {
        self.set_page(page);
        self.fetch_products(FilterPatch::default()).await
    }

    pub async fn fetch_product_by_id(&self, product_id: &str) -> Result<Product, ApiError> {
        self.start(true);
        match self.api.get_product(product_id).await {
            Ok(product) => {
                self.store.dispatch(CatalogAction::ProductLoaded(product.clone()));
                Ok(product)
            }
            Err(e) => {
                self.fail(&e, "Failed to fetch product", true);
                Err(e)
            }
        }
    }

    pub async fn fetch_featured_products(&self) -> Result<Vec<Product>, ApiError> {
        self.start(false);
        match self.api.get_featured_products().await {
            Ok(products) => {
                self.store.dispatch(CatalogAction::FeaturedLoaded(products.clone()));
                Ok(products)
            }
            Err(e) => {
                self.fail(&e, "Failed to fetch featured products", false);
                Err(e)
            }
        }
    }

    pub async fn fetch_categories(&self) -> Result<Vec<ProductCategory>, ApiError> {
        self.start(false);
        match self.api.get_categories().await {
            Ok(categories) => {
                self.store.dispatch(CatalogAction::CategoriesLoaded(categories.clone()));
                Ok(categories)
            }
            Err(e) => {
                self.fail(&e, "Failed to fetch categories", false);
                Err(e)
            }
        }
    }

    pub async fn search_products(&self, query: &str) -> Result<Vec<Product>, ApiError> {
        self.start(true);
        let result = self.api.search_products(query).await;
        self.load_results(result, "Failed to search products")
    }

    pub async fn fetch_products_by_category(
        &self,
        category_id: &str,
    ) -> Result<Vec<Product>, ApiError> {
        self.start(true);
        let result = self.api.get_products_by_category(category_id).await;
        self.load_results(result, "Failed to fetch products")
    }

    pub async fn fetch_related_products(&self, product_id: &str) -> Result<Vec<Product>, ApiError> {
        self.start(false);
        match self.api.get_related_products(product_id).await {
            Ok(products) => {
                self.store.dispatch(CatalogAction::RelatedLoaded(products.clone()));
                Ok(products)
            }
            Err(e) => {
                self.fail(&e, "Failed to fetch related products", false);
                Err(e)
            }
        }
    }

    fn load_results(
        &self,
        result: Result<Vec<Product>, ApiError>,
        default: &str,
    ) -> Result<Vec<Product>, ApiError> {
        match &result {
            Ok(products) => {
                let products = products.clone();
                self.store.dispatch(CatalogAction::ResultsLoaded(products));
            }
            Err(e) => self.fail(e, default, true),
        }
        result
    }

    fn start(&self, tracks_loading: bool) {
        self.store.dispatch(CatalogAction::Started { tracks_loading });
    }

    fn fail(&self, e: &ApiError, default: &str, tracks_loading: bool) {
        let message = e.message_or(default);
        crate::log_error!("catalog request failed: {}", message);
        self.store.dispatch(CatalogAction::Failed {
            message,
            tracks_loading,
        });
    }
}
