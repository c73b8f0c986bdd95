use crate::config::Config;
use crate::error::{AppError, AppResult};
use lettre::{
    message::header::ContentType, transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

pub struct EmailService {
    config: Config,
}

impl EmailService {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub async fn send_client_activated(&self, to: &str, prenoms: &str) -> AppResult<()> {
        let body = format!(
            "Bonjour {},\n\nVotre compte IvoirImmo a été activé. \
             Vous pouvez désormais vous connecter et publier vos annonces.\n\n\
             L'équipe IvoirImmo",
            prenoms
        );
        self.send_mail(to, "Votre compte IvoirImmo est actif", &body)
            .await
    }

    pub async fn send_annonce_activated(&self, to: &str, titre: &str, code: &str) -> AppResult<()> {
        let body = format!(
            "Bonjour,\n\nVotre annonce « {} » ({}) a été validée par notre équipe \
             et est maintenant visible sur IvoirImmo.\n\n\
             L'équipe IvoirImmo",
            titre, code
        );
        self.send_mail(to, "Votre annonce est en ligne", &body).await
    }

    pub async fn send_reset_code(&self, to: &str, code: &str) -> AppResult<()> {
        let body = format!(
            "Bonjour,\n\nVotre code de réinitialisation IvoirImmo : {}\n\
             Il expire dans 15 minutes. Ne le communiquez à personne.\n\n\
             L'équipe IvoirImmo",
            code
        );
        self.send_mail(to, "Réinitialisation de votre mot de passe", &body)
            .await
    }

    async fn send_mail(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        if !self.config.email_enabled {
            tracing::info!("Email disabled. Would send to {}: {}", to, subject);
            return Ok(());
        }

        let email = Message::builder()
            .from(
                self.config
                    .smtp_from
                    .parse()
                    .map_err(|e| AppError::Email(format!("{}", e)))?,
            )
            .to(to.parse().map_err(|e| AppError::Email(format!("{}", e)))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| AppError::Email(e.to_string()))?;

        let mut transport_builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)
                .map_err(|e| AppError::Email(e.to_string()))?
                .port(self.config.smtp_port);

        if let (Some(user), Some(pass)) = (&self.config.smtp_user, &self.config.smtp_password) {
            transport_builder =
                transport_builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        let mailer = transport_builder.build();
        mailer
            .send(email)
            .await
            .map_err(|e| AppError::Email(e.to_string()))?;

        tracing::info!("Email sent to {}", to);
        Ok(())
    }
}
