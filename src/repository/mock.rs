use mockall::mock;

use super::{
    BookingReader, BookingWriter, CatalogReader, GatewayCustomerReader, GatewayCustomerWriter,
    InvoiceReader, InvoiceWriter, MandateReader, MandateWriter, PaymentOptionReader,
    PaymentReader, PaymentWriter, RepositoryResult, WebhookEventLedger,
};
use crate::domain::booking::{Booking, NewBooking, PaymentStage, UpdateBooking};
use crate::domain::catalog::Catalog;
use crate::domain::invoice::{Invoice, NewInvoice};
use crate::domain::mandate::{
    GatewayCustomer, Mandate, MandateStatus, NewGatewayCustomer, NewMandate,
};
use crate::domain::payment::{NewPayment, Payment, PaymentStatus};
use crate::domain::payment_option::PaymentOption;

mock! {
    pub CatalogReader {}

    impl CatalogReader for CatalogReader {
        fn load_catalog(&self) -> RepositoryResult<Catalog>;
    }
}

mock! {
    pub PaymentOptionReader {}

    impl PaymentOptionReader for PaymentOptionReader {
        fn get_payment_option_by_id(&self, id: i32) -> RepositoryResult<Option<PaymentOption>>;
        fn list_payment_options(&self) -> RepositoryResult<Vec<PaymentOption>>;
    }
}

mock! {
    pub BookingReader {}

    impl BookingReader for BookingReader {
        fn get_booking_by_id(&self, id: i32, user_id: i32) -> RepositoryResult<Option<Booking>>;
        fn get_booking(&self, id: i32) -> RepositoryResult<Option<Booking>>;
        fn list_bookings(&self, user_id: i32) -> RepositoryResult<Vec<Booking>>;
    }
}

mock! {
    pub BookingWriter {}

    impl BookingWriter for BookingWriter {
        fn create_booking(&self, new_booking: &NewBooking) -> RepositoryResult<Booking>;
        fn update_booking(&self, booking_id: i32, updates: &UpdateBooking) -> RepositoryResult<Booking>;
        fn claim_redirect_flow(&self, booking_id: i32, flow_id: &str) -> RepositoryResult<bool>;
        fn advance_payment_stage(&self, booking_id: i32, target: PaymentStage) -> RepositoryResult<bool>;
    }
}

mock! {
    pub GatewayCustomerReader {}

    impl GatewayCustomerReader for GatewayCustomerReader {
        fn get_gateway_customer_by_user(&self, user_id: i32) -> RepositoryResult<Option<GatewayCustomer>>;
    }
}

mock! {
    pub GatewayCustomerWriter {}

    impl GatewayCustomerWriter for GatewayCustomerWriter {
        fn create_gateway_customer(&self, new_customer: &NewGatewayCustomer) -> RepositoryResult<GatewayCustomer>;
    }
}

mock! {
    pub MandateReader {}

    impl MandateReader for MandateReader {
        fn get_mandate_by_id(&self, id: i32) -> RepositoryResult<Option<Mandate>>;
        fn get_mandate_by_gateway_id(&self, gateway_mandate_id: &str) -> RepositoryResult<Option<Mandate>>;
        fn get_mandate_for_booking(&self, booking_id: i32) -> RepositoryResult<Option<Mandate>>;
    }
}

mock! {
    pub MandateWriter {}

    impl MandateWriter for MandateWriter {
        fn create_mandate(&self, new_mandate: &NewMandate) -> RepositoryResult<Mandate>;
        fn set_mandate_status(&self, mandate_id: i32, from: &[MandateStatus], to: MandateStatus) -> RepositoryResult<bool>;
    }
}

mock! {
    pub PaymentReader {}

    impl PaymentReader for PaymentReader {
        fn get_payment_by_gateway_id(&self, gateway_payment_id: &str) -> RepositoryResult<Option<Payment>>;
        fn list_payments_for_booking(&self, booking_id: i32) -> RepositoryResult<Vec<Payment>>;
    }
}

mock! {
    pub PaymentWriter {}

    impl PaymentWriter for PaymentWriter {
        fn create_payment(&self, new_payment: &NewPayment) -> RepositoryResult<Payment>;
        fn set_payment_status(&self, payment_id: i32, from: &[PaymentStatus], to: PaymentStatus) -> RepositoryResult<bool>;
    }
}

mock! {
    pub InvoiceReader {}

    impl InvoiceReader for InvoiceReader {
        fn get_invoice_by_payment_id(&self, payment_id: i32) -> RepositoryResult<Option<Invoice>>;
    }
}

mock! {
    pub InvoiceWriter {}

    impl InvoiceWriter for InvoiceWriter {
        fn create_invoice(&self, new_invoice: &NewInvoice) -> RepositoryResult<Invoice>;
    }
}

mock! {
    pub WebhookEventLedger {}

    impl WebhookEventLedger for WebhookEventLedger {
        fn is_webhook_event_applied(&self, event_id: &str) -> RepositoryResult<bool>;
        fn record_webhook_event(&self, event_id: &str, resource_type: &str, action: &str) -> RepositoryResult<bool>;
    }
}
