pub mod account_service;
pub mod fee_service;
pub mod payment_service;

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::AuthService;
use crate::repository::*;

pub use account_service::AccountService;
pub use fee_service::FeeService;
pub use payment_service::PaymentService;

pub struct ServiceContext {
    pub account_repo: Arc<dyn AccountRepository>,
    pub payment_repo: Arc<dyn PaymentRepository>,
    pub notice_repo: Arc<dyn NoticeRepository>,
    pub material_repo: Arc<dyn StudyMaterialRepository>,
    pub enquiry_repo: Arc<dyn EnquiryRepository>,
    pub chat_session_repo: Arc<dyn ChatSessionRepository>,
    pub auth_service: Arc<AuthService>,
    pub fee_service: Arc<FeeService>,
    pub payment_service: Arc<PaymentService>,
    pub account_service: Arc<AccountService>,
    pub db_pool: SqlitePool,
}

impl ServiceContext {
    pub fn new(
        account_repo: Arc<dyn AccountRepository>,
        payment_repo: Arc<dyn PaymentRepository>,
        notice_repo: Arc<dyn NoticeRepository>,
        material_repo: Arc<dyn StudyMaterialRepository>,
        enquiry_repo: Arc<dyn EnquiryRepository>,
        chat_session_repo: Arc<dyn ChatSessionRepository>,
        auth_service: Arc<AuthService>,
        db_pool: SqlitePool,
    ) -> Self {
        let fee_service = Arc::new(FeeService::new(payment_repo.clone()));
        let payment_service = Arc::new(PaymentService::new(
            payment_repo.clone(),
            account_repo.clone(),
            fee_service.clone(),
        ));
        let account_service = Arc::new(AccountService::new(account_repo.clone()));

        Self {
            account_repo,
            payment_repo,
            notice_repo,
            material_repo,
            enquiry_repo,
            chat_session_repo,
            auth_service,
            fee_service,
            payment_service,
            account_service,
            db_pool,
        }
    }
}
