use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::external::PlacePrediction;
use crate::handlers;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.as_mut().unwrap();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        )
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::register,
        handlers::auth::me,
        handlers::auth::update_me,
        handlers::students::list_students,
        handlers::students::create_student,
        handlers::students::get_student,
        handlers::students::update_student,
        handlers::students::archive_student,
        handlers::classes::list_classes,
        handlers::classes::create_class,
        handlers::classes::get_class,
        handlers::classes::update_class,
        handlers::classes::cancel_class,
        handlers::classes::class_cost,
        handlers::classes::list_enrollments,
        handlers::classes::enroll,
        handlers::classes::drop_enrollment,
        handlers::notes::list_notes,
        handlers::notes::create_note,
        handlers::notes::get_note,
        handlers::notes::update_note,
        handlers::notes::delete_note,
        handlers::notes::format_note,
        handlers::notes::transcribe_note,
        handlers::payments::record_payment,
        handlers::payments::list_payments,
        handlers::lesson_packs::list_packs,
        handlers::lesson_packs::create_pack,
        handlers::lesson_packs::update_pack,
        handlers::lesson_packs::checkout,
        handlers::lesson_packs::direct_purchase,
        handlers::lesson_packs::spend_lesson,
        handlers::lesson_packs::history,
        handlers::lesson_packs::student_history,
        handlers::lesson_requests::create_request,
        handlers::lesson_requests::list_requests,
        handlers::lesson_requests::accept_request,
        handlers::lesson_requests::decline_request,
        handlers::lesson_requests::complete_request,
        handlers::waivers::list_templates,
        handlers::waivers::create_template,
        handlers::waivers::update_template,
        handlers::waivers::list_signatures,
        handlers::waivers::sign_waiver,
        handlers::studios::get_current,
        handlers::studios::update_current,
        handlers::studios::address_autocomplete,
        handlers::studios::sync_inquiries,
        handlers::studios::list_inquiries,
        handlers::studios::reply_to_inquiry,
        handlers::studios::close_inquiry,
    ),
    components(
        schemas(
            ApiError,
            Role,
            Profile,
            ProfileResponse,
            RegisterProfileRequest,
            UpdateProfileRequest,
            Student,
            CreateStudentRequest,
            UpdateStudentRequest,
            PricingModel,
            Class,
            ClassResponse,
            ClassCostResponse,
            CreateClassRequest,
            UpdateClassRequest,
            Enrollment,
            EnrollmentDetail,
            EnrollmentStatus,
            Note,
            CreateNoteRequest,
            UpdateNoteRequest,
            TranscribeNoteRequest,
            Payment,
            PaymentMethod,
            PaymentStatus,
            RecordPaymentRequest,
            LessonPack,
            CreateLessonPackRequest,
            UpdateLessonPackRequest,
            LessonPackPurchase,
            LessonPackUsage,
            DirectPurchaseRequest,
            SpendLessonRequest,
            SpendLessonResponse,
            PurchaseHistoryEntry,
            LessonPackHistoryResponse,
            CheckoutSessionResponse,
            LessonRequest,
            LessonRequestStatus,
            CreateLessonRequestRequest,
            WaiverTemplate,
            CreateWaiverTemplateRequest,
            UpdateWaiverTemplateRequest,
            Waiver,
            SignWaiverRequest,
            Studio,
            UpdateStudioRequest,
            StudioInquiry,
            InquiryStatus,
            InquirySyncResponse,
            ReplyInquiryRequest,
            PlacePrediction,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Profile registration and lookup"),
        (name = "students", description = "Studio roster management"),
        (name = "classes", description = "Class schedule, pricing and enrollment"),
        (name = "notes", description = "Lesson notes, formatting and transcription"),
        (name = "payments", description = "Payment records"),
        (name = "lesson-packs", description = "Lesson pack sales and balance ledger"),
        (name = "lesson-requests", description = "Private lesson requests"),
        (name = "waivers", description = "Waiver templates and signatures"),
        (name = "studios", description = "Studio settings and inquiries"),
    ),
    info(
        title = "DanceDesk Backend API",
        version = "1.0.0",
        description = "DanceDesk studio management REST API documentation"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
