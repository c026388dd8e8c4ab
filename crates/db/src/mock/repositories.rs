use async_trait::async_trait;
use chrono::NaiveDateTime;
use clinic_core::{
    errors::ClinicResult,
    models::{
        appointment::{Appointment, AppointmentPatch, NewAppointment},
        doctor::Doctor,
    },
    repository::{AppointmentRepository, DoctorDirectory},
};
use mockall::mock;
use uuid::Uuid;

// Mock collaborators for testing
mock! {
    pub DoctorRepo {}

    #[async_trait]
    impl DoctorDirectory for DoctorRepo {
        async fn find_by_id(&self, id: Uuid) -> ClinicResult<Option<Doctor>>;

        async fn list(&self) -> ClinicResult<Vec<Doctor>>;
    }
}

mock! {
    pub AppointmentRepo {}

    #[async_trait]
    impl AppointmentRepository for AppointmentRepo {
        async fn find_by_doctor_and_range(
            &self,
            doctor_id: Uuid,
            start_inclusive: NaiveDateTime,
            end_exclusive: NaiveDateTime,
        ) -> ClinicResult<Vec<Appointment>>;

        async fn find_by_id(&self, id: Uuid) -> ClinicResult<Option<Appointment>>;

        async fn list(&self) -> ClinicResult<Vec<Appointment>>;

        async fn insert(&self, appointment: NewAppointment) -> ClinicResult<Appointment>;

        async fn update(&self, id: Uuid, patch: AppointmentPatch) -> ClinicResult<Appointment>;

        async fn delete(&self, id: Uuid) -> ClinicResult<()>;
    }
}
