//! Rust Gradebook - 考试成绩录入与评分服务
//!
//! 基于 Actix Web 构建的考试成绩后端：按等级表计算等级，维护录入会话，
//! 批量提交成绩并生成考试报告。
//!
//! # 架构
//! - `cache`: 缓存层（Moka/Redis），同时承载录入会话
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `grading`: 评分引擎（等级表、计分、工作集、提交、报告）
//! - `models`: 数据模型定义
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `services`: 业务逻辑层
//! - `storage`: 数据存储层（SeaORM）
//! - `utils`: 工具函数

pub mod cache;
pub mod config;
pub mod entity;
pub mod errors;
pub mod grading;
pub mod models;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
