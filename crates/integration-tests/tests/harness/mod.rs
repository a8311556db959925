#![allow(dead_code)]

pub mod mock_deepseek;
pub mod recording;
