use crate::{
    http_client::handle_service_result,
    rame_client::RameClient,
    services::{
        notices::{Notice, NoticeBoard},
        signal::AppliedSignal,
    },
};
use actix_web::{HttpResponse, Responder, web};
use anyhow::Context;
use log::{debug, error, warn};
use rameplayer_admin_core::{
    SaveOrchestrator, SaveOutcome, SettingsDraft,
    ports::{ServerInfo, SettingsGateway},
};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;

pub type Orchestrator<Gateway> = SaveOrchestrator<Arc<Gateway>, NoticeBoard, AppliedSignal>;

#[derive(Debug, Serialize)]
pub struct SaveResponse {
    #[serde(flatten)]
    pub outcome: SaveOutcome,
    pub notices: Vec<Notice>,
}

pub struct Api<Gateway, Server>
where
    Gateway: SettingsGateway + Send + Sync,
    Server: ServerInfo,
{
    /// Read access to the device settings, shared with the orchestrator
    pub gateway: Arc<Gateway>,
    /// Locked only by saves
    pub orchestrator: Mutex<Orchestrator<Gateway>>,
    pub notices: NoticeBoard,
    pub server: Server,
}

impl<Gateway, Server> Api<Gateway, Server>
where
    Gateway: SettingsGateway + Send + Sync,
    Server: ServerInfo,
{
    pub fn new(gateway: Gateway, server: Server, applied: AppliedSignal) -> Self {
        let gateway = Arc::new(gateway);
        let notices = NoticeBoard::default();

        Api {
            orchestrator: Mutex::new(SaveOrchestrator::new(
                gateway.clone(),
                notices.clone(),
                applied,
            )),
            gateway,
            notices,
            server,
        }
    }

    pub async fn healthcheck(api: web::Data<Self>) -> impl Responder {
        debug!("healthcheck() called");

        let info = api
            .server
            .server_version()
            .await
            .and_then(|version| RameClient::version_info(&version));

        match info {
            Ok(info) if info.mismatch => HttpResponse::ServiceUnavailable().json(&info),
            Ok(info) => HttpResponse::Ok().json(&info),
            Err(e) => {
                error!("healthcheck failed: {e:#}");
                HttpResponse::InternalServerError().body(e.to_string())
            }
        }
    }

    pub async fn version() -> impl Responder {
        HttpResponse::Ok().body(env!("CARGO_PKG_VERSION"))
    }

    pub async fn settings(api: web::Data<Self>) -> impl Responder {
        debug!("settings() called");

        let draft = api
            .gateway
            .fetch_settings()
            .await
            .context("failed to fetch settings");

        handle_service_result(draft, "settings")
    }

    pub async fn save_settings(
        draft: web::Json<SettingsDraft>,
        api: web::Data<Self>,
    ) -> impl Responder {
        debug!("save_settings() called");

        let Ok(mut orchestrator) = api.orchestrator.try_lock() else {
            warn!("save_settings rejected: save already in progress");
            return HttpResponse::Conflict().body("save already in progress");
        };

        let outcome = orchestrator.submit(draft.into_inner()).await;
        drop(orchestrator);

        let response = SaveResponse {
            outcome,
            notices: api.notices.current(),
        };

        match response.outcome {
            SaveOutcome::Persisted => HttpResponse::Ok().json(&response),
            SaveOutcome::Rejected { .. } => HttpResponse::UnprocessableEntity().json(&response),
            SaveOutcome::Failed { .. } => HttpResponse::BadGateway().json(&response),
        }
    }

    pub async fn notices(api: web::Data<Self>) -> impl Responder {
        HttpResponse::Ok().json(api.notices.current())
    }

    pub async fn dismiss_notices(api: web::Data<Self>) -> impl Responder {
        debug!("dismiss_notices() called");
        api.notices.dismiss_sticky();
        HttpResponse::Ok().finish()
    }
}
