pub mod annonce;
pub mod categorie;
pub mod client;
pub mod commande;
pub mod commentaire;
pub mod geo;

pub use annonce::{
    generate_annonce_code, Annonce, AnnonceResponse, AnnoncesQuery, CreateAnnonceRequest,
    ModerationResponse, ProprietaireInfo, TypeAnnonce, UpdateAnnonceRequest,
};
pub use categorie::{
    Categorie, CategorieResponse, CreateCategorieRequest, CreateSousCategorieRequest,
    SousCategorie, SousCategorieResponse, UpdateCategorieRequest,
};
pub use client::{
    Admin, AdminAuthResponse, AdminPublic, AuthResponse, ChangePasswordRequest, Client,
    ClientPublic, ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest,
    UpdateClientRequest,
};
pub use commande::{
    Commande, CommandeResponse, CreateCommandeRequest, ServicePayant, ServicePayantResponse,
    StatutCommande, UpdateStatutRequest,
};
pub use commentaire::{
    note_valide, Commentaire, CommentaireResponse, CreateCommentaireRequest,
};
pub use geo::{
    bande_coherente, Commune, CommuneResponse, CreateCommuneRequest, CreateQuartierRequest,
    EstimationResponse, PrixQuartier, Quartier, QuartierEstimation, QuartierResponse,
    UpdateCommuneRequest, UpdatePrixRequest, UpdateQuartierRequest, UpsertEstimationRequest,
};
