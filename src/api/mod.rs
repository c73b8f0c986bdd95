pub mod admin;
pub mod annonces;
pub mod auth;
pub mod categories;
pub mod clients;
pub mod commandes;
pub mod commentaires;
pub mod geo;
pub mod uploads;
pub mod wishlist;

use crate::middleware::AppState;
use axum::Router;

pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::routes())
        .nest("/clients", clients::routes())
        .nest("/annonces", annonces::routes().merge(commentaires::routes()))
        .nest("/wishlist", wishlist::routes())
        .nest("/communes", geo::commune_routes())
        .nest("/quartiers", geo::quartier_routes())
        .nest("/categories", categories::routes())
        .nest("/services", commandes::service_routes())
        .nest("/commandes", commandes::routes())
        .nest("/uploads", uploads::routes())
        .nest("/admin", admin::routes())
        .nest("/admin/clients", clients::admin_routes())
        .nest("/admin/annonces", annonces::admin_routes())
        .nest("/admin/commentaires", commentaires::admin_routes())
        .nest("/admin/communes", geo::admin_commune_routes())
        .nest("/admin/quartiers", geo::admin_quartier_routes())
        .nest("/admin/categories", categories::admin_routes())
        .nest("/admin/commandes", commandes::admin_routes())
}
