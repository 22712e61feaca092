//! 핸들러에서 분리한 도메인 서비스.

pub mod company;
