use crate::app::catalog::{CatalogItem, CreateCatalogItem};
use crate::domain::model::{
    CarResponse, CarWithSales, CountryResponse, CreateCar, CreateCountry, CreatePerson,
    CreateSale, PersonResponse, PersonWithCountry, SaleResponse, SaleWithCar, UpdateCar,
    UpdateCountry, UpdatePerson, UpdateSale,
};
use crate::transport::http::error::ErrorBody;
use crate::transport::http::handlers::{cars, catalog, countries, health, people, sales};
use crate::transport::http::types::AppState;
use axum::routing::{get, post};
use axum::Router;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        countries::create_country,
        countries::list_countries,
        countries::get_country,
        countries::update_country,
        countries::delete_country,
        countries::search_countries,
        people::create_person,
        people::list_people,
        people::get_person,
        people::update_person,
        people::delete_person,
        people::get_person_with_country,
        people::list_people_with_country,
        people::search_people,
        cars::create_car,
        cars::list_cars,
        cars::get_car,
        cars::update_car,
        cars::delete_car,
        cars::get_car_by_chassis,
        cars::get_car_with_sales,
        cars::search_cars,
        sales::create_sale,
        sales::list_sales,
        sales::get_sale,
        sales::update_sale,
        sales::delete_sale,
        sales::get_sales_by_car,
        sales::get_sales_by_buyer,
        sales::get_sale_with_car,
        sales::search_sales,
        catalog::list_catalog,
        catalog::get_catalog_item,
        catalog::add_catalog_item,
        catalog::delete_catalog_item
    ),
    components(schemas(
        ErrorBody,
        CountryResponse,
        CreateCountry,
        UpdateCountry,
        PersonResponse,
        PersonWithCountry,
        CreatePerson,
        UpdatePerson,
        CarResponse,
        CarWithSales,
        CreateCar,
        UpdateCar,
        SaleResponse,
        SaleWithCar,
        CreateSale,
        UpdateSale,
        CatalogItem,
        CreateCatalogItem
    ))
)]
pub struct ApiDoc;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::healthcheck_handler))
        .route("/countries", post(countries::create_country).get(countries::list_countries))
        .route("/countries/search", get(countries::search_countries))
        .route(
            "/countries/:id",
            get(countries::get_country)
                .put(countries::update_country)
                .delete(countries::delete_country),
        )
        .route("/people", post(people::create_person).get(people::list_people))
        .route("/people/search", get(people::search_people))
        .route("/people/with-country", get(people::list_people_with_country))
        .route(
            "/people/:id",
            get(people::get_person)
                .put(people::update_person)
                .delete(people::delete_person),
        )
        .route("/people/:id/with-country", get(people::get_person_with_country))
        .route("/cars", post(cars::create_car).get(cars::list_cars))
        .route("/cars/search", get(cars::search_cars))
        .route("/cars/chassis/:value", get(cars::get_car_by_chassis))
        .route(
            "/cars/:id",
            get(cars::get_car).put(cars::update_car).delete(cars::delete_car),
        )
        .route("/cars/:id/with-sales", get(cars::get_car_with_sales))
        .route("/sales", post(sales::create_sale).get(sales::list_sales))
        .route("/sales/search", get(sales::search_sales))
        .route("/sales/car/:car_id", get(sales::get_sales_by_car))
        .route("/sales/buyer/:name", get(sales::get_sales_by_buyer))
        .route(
            "/sales/:id",
            get(sales::get_sale).put(sales::update_sale).delete(sales::delete_sale),
        )
        .route("/sales/:id/with-car", get(sales::get_sale_with_car))
        .route("/catalog", get(catalog::list_catalog).post(catalog::add_catalog_item))
        .route(
            "/catalog/:id",
            get(catalog::get_catalog_item).delete(catalog::delete_catalog_item),
        )
        .with_state(app_state)
}
