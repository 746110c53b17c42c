//! Links as a wire format: QR payload sniffing and decoding, receive-link
//! generation and the bearer voucher scheme.

mod error;
pub mod qr;
pub mod receive;
pub mod voucher;

pub use error::LinkError;
pub use qr::{QRFormat, QRPayload, parse_qr_code, parse_qr_format};
pub use receive::{Tip, generate_legacy_receive_link, generate_receive_link};
pub use voucher::{CreatedVoucher, Voucher, create_voucher, parse_voucher};
