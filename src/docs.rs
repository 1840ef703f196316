use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::authors::model::{Author, AuthorPayload};
use crate::modules::books::model::{Book, CreateBookDto, Genre, UpdateBookDto};
use crate::modules::users::controller::ErrorResponse;
use crate::modules::users::model::{LoginRequest, RegisterRequestDto, TokenResponse, UserDetail};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::books::controller::list_books,
        crate::modules::books::controller::get_book,
        crate::modules::books::controller::create_book,
        crate::modules::books::controller::update_book,
        crate::modules::books::controller::delete_book,
        crate::modules::books::controller::import_books,
        crate::modules::books::controller::export_books,
        crate::modules::authors::controller::list_authors,
        crate::modules::authors::controller::get_author,
        crate::modules::authors::controller::create_author,
        crate::modules::authors::controller::update_author,
        crate::modules::authors::controller::delete_author,
        crate::modules::users::controller::register_user,
        crate::modules::users::controller::login_user,
        crate::modules::users::controller::current_user,
    ),
    components(
        schemas(
            Book,
            Genre,
            CreateBookDto,
            UpdateBookDto,
            Author,
            AuthorPayload,
            UserDetail,
            RegisterRequestDto,
            LoginRequest,
            TokenResponse,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Books", description = "Book catalog endpoints"),
        (name = "Authors", description = "Author management endpoints"),
        (name = "Users", description = "Registration and authentication endpoints")
    ),
    info(
        title = "Bookstack API",
        version = "0.1.0",
        description = "A REST API for managing a catalog of books and authors, built with Rust, Axum, and PostgreSQL with JWT-based authentication.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
