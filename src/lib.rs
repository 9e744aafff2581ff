//! askshell: AI 셸 도우미
//!
//! 여러 LLM provider를 하나의 게이트웨이 뒤에 두고, 작업 종류별 프롬프트로 호출한 뒤
//! `label ||| content` 형식의 응답을 파싱해 터미널용/클립보드용 두 채널로 렌더링합니다.

pub mod ai;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod ui;
