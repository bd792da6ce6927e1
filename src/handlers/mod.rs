// Handler modules
//
// Public (no auth): /auth/register, /auth/login - token acquisition
// Protected (JWT auth): /manajemen-barang-bekas - owner-scoped records

pub mod auth;
pub mod barang;
