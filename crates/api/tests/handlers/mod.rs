mod appointment_test;
mod doctor_test;
mod middleware_test;
mod storage_test;
