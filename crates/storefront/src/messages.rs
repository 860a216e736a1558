//! Localized user-facing messages.
//!
//! The deployed demo speaks Indonesian to its users; error codes stay
//! internal and the view layer shows these strings instead. Pure lookup
//! keyed by [`ErrorKind`] - a view concern kept out of the services.

use crate::error::ErrorKind;

/// Message shown for each error kind.
#[must_use]
pub const fn for_kind(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::DuplicateEmail => "Email sudah terdaftar!",
        ErrorKind::WeakPassword => "Password harus minimal 8 karakter!",
        ErrorKind::InvalidEmail => "Format email tidak valid!",
        ErrorKind::EmptyName => "Nama tidak boleh kosong.",
        ErrorKind::InvalidCredentials => "Email atau password salah!",
        ErrorKind::NotAuthenticated => "Silakan login terlebih dahulu!",
        ErrorKind::OutOfStock => "Produk sedang habis!",
        ErrorKind::ProductNotFound => "Produk tidak ditemukan.",
        ErrorKind::EmptyCart => "Keranjang Anda kosong!",
        ErrorKind::OrderNotFound => "Pesanan tidak ditemukan.",
        ErrorKind::UserNotFound => "User tidak ditemukan.",
        ErrorKind::CatalogUnavailable => "Katalog tidak tersedia, coba lagi nanti.",
        ErrorKind::StorageUnavailable => "Penyimpanan tidak tersedia, operasi dibatalkan.",
    }
}

/// Success messages for the auth and checkout flows.
pub mod success {
    pub const REGISTERED: &str = "Registrasi berhasil!";
    pub const LOGGED_IN: &str = "Login berhasil!";
    pub const LOGGED_OUT: &str = "Logout berhasil!";
    pub const PAID: &str =
        "Pembayaran berhasil! Terima kasih telah berbelanja. Keranjang Anda telah dikosongkan.";
    pub const USER_UPDATED: &str = "User berhasil diperbarui.";
    pub const USER_DELETED: &str = "User dihapus.";
}
