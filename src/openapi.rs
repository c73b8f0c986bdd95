use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "IvoirImmo API",
        version = "1.0.0",
        description = "Backend API d'IvoirImmo - plateforme d'annonces immobilières en Côte d'Ivoire",
        contact(
            name = "IvoirImmo Team",
            email = "support@ivoirimmo.ci"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    tags(
        (name = "auth", description = "Inscription, connexion et mots de passe"),
        (name = "clients", description = "Profil du client"),
        (name = "annonces", description = "Annonces immobilières"),
        (name = "commentaires", description = "Avis sur les annonces"),
        (name = "wishlist", description = "Liste de souhaits"),
        (name = "geo", description = "Communes et quartiers"),
        (name = "estimation", description = "Coefficients d'estimation par quartier"),
        (name = "categories", description = "Catégories d'annonces"),
        (name = "commandes", description = "Services payants et commandes"),
        (name = "uploads", description = "Téléversement d'images"),
        (name = "admin", description = "Back office")
    ),
    paths(
        // Auth
        crate::api::auth::register,
        crate::api::auth::login,
        crate::api::auth::admin_login,
        crate::api::auth::forgot_password,
        crate::api::auth::reset_password,
        crate::api::auth::change_password,
        // Clients
        crate::api::clients::get_me,
        crate::api::clients::update_me,
        crate::api::clients::list_clients,
        crate::api::clients::toggle_activation,
        // Annonces
        crate::api::annonces::list_annonces,
        crate::api::annonces::get_annonce,
        crate::api::annonces::create_annonce,
        crate::api::annonces::update_annonce,
        crate::api::annonces::delete_annonce,
        crate::api::annonces::my_annonces,
        crate::api::annonces::admin_list_annonces,
        crate::api::annonces::toggle_moderation,
        // Commentaires
        crate::api::commentaires::list_commentaires,
        crate::api::commentaires::create_commentaire,
        crate::api::commentaires::admin_list_commentaires,
        crate::api::commentaires::toggle_moderation,
        crate::api::commentaires::delete_commentaire,
        // Wishlist
        crate::api::wishlist::toggle,
        crate::api::wishlist::my_wishlist,
        // Geo
        crate::api::geo::list_communes,
        crate::api::geo::list_quartiers_of_commune,
        crate::api::geo::get_quartier,
        crate::api::geo::get_prix_quartier,
        crate::api::geo::get_estimation,
        crate::api::geo::create_commune,
        crate::api::geo::update_commune,
        crate::api::geo::delete_commune,
        crate::api::geo::create_quartier,
        crate::api::geo::update_quartier,
        crate::api::geo::delete_quartier,
        crate::api::geo::update_prix_quartier,
        crate::api::geo::upsert_estimation,
        // Categories
        crate::api::categories::list_categories,
        crate::api::categories::create_categorie,
        crate::api::categories::update_categorie,
        crate::api::categories::delete_categorie,
        crate::api::categories::create_sous_categorie,
        crate::api::categories::delete_sous_categorie,
        // Commandes
        crate::api::commandes::list_services,
        crate::api::commandes::create_commande,
        crate::api::commandes::my_commandes,
        crate::api::commandes::admin_list_commandes,
        crate::api::commandes::update_statut,
        // Uploads
        crate::api::uploads::upload_image,
        // Admin
        crate::api::admin::get_dashboard,
    ),
    components(
        schemas(
            // Auth
            crate::models::RegisterRequest,
            crate::models::LoginRequest,
            crate::models::AuthResponse,
            crate::models::AdminAuthResponse,
            crate::models::ForgotPasswordRequest,
            crate::models::ResetPasswordRequest,
            crate::models::ChangePasswordRequest,
            crate::models::ClientPublic,
            crate::models::AdminPublic,
            crate::api::auth::RegisterResponse,
            // Clients
            crate::models::UpdateClientRequest,
            crate::api::clients::ActivationResponse,
            // Annonces
            crate::models::TypeAnnonce,
            crate::models::AnnonceResponse,
            crate::models::ProprietaireInfo,
            crate::models::CreateAnnonceRequest,
            crate::models::UpdateAnnonceRequest,
            crate::models::ModerationResponse,
            crate::api::annonces::SuccessResponse,
            // Commentaires
            crate::models::CommentaireResponse,
            crate::models::CreateCommentaireRequest,
            // Wishlist
            crate::api::wishlist::WishlistToggleResponse,
            // Geo
            crate::models::CommuneResponse,
            crate::models::QuartierResponse,
            crate::models::PrixQuartier,
            crate::models::EstimationResponse,
            crate::models::CreateCommuneRequest,
            crate::models::UpdateCommuneRequest,
            crate::models::CreateQuartierRequest,
            crate::models::UpdateQuartierRequest,
            crate::models::UpdatePrixRequest,
            crate::models::UpsertEstimationRequest,
            // Categories
            crate::models::CategorieResponse,
            crate::models::SousCategorieResponse,
            crate::models::CreateCategorieRequest,
            crate::models::UpdateCategorieRequest,
            crate::models::CreateSousCategorieRequest,
            // Commandes
            crate::models::StatutCommande,
            crate::models::ServicePayantResponse,
            crate::models::CommandeResponse,
            crate::models::CreateCommandeRequest,
            crate::models::UpdateStatutRequest,
            // Uploads
            crate::api::uploads::UploadResponse,
        )
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::Http::new(
                        utoipa::openapi::security::HttpAuthScheme::Bearer,
                    ),
                ),
            );
        }
    }
}
