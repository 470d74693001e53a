//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，包括子命令和参数。
//! 所有用户通过命令行与程序交互的入口点都在此模块中定义。

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// 一款基于 LSB (最低有效位) 隐写术的命令行工具，可把任意文件或目录打包后藏进无损图像 (如 PNG, BMP) 的像素中。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "一款基于 LSB (最低有效位) 隐写术的命令行工具。\n待隐藏的文件或目录会先被打包为 ZIP，再逐比特写入每个像素红、绿、蓝通道的最低位。"
)]
pub struct Cli {
    /// 输出调试日志 (也可以通过 RUST_LOG 环境变量控制)。
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令：embed (隐藏)、extract (提取) 和 capacity (容量查询)。
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 把文件或目录隐藏到无损格式图像中。
    Embed(EmbedArgs),

    /// 从经过隐写的图像中提取隐藏的文件或目录。
    Extract(ExtractArgs),

    /// 显示图像能容纳的数据量。
    Capacity(CapacityArgs),
}

/// 'embed' 命令所需的参数。
#[derive(Args, Debug)]
pub struct EmbedArgs {
    /// 用作载体的输入图像文件路径 (如 PNG, BMP)。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 要隐藏的文件或目录路径。
    #[arg(short, long)]
    pub source: PathBuf,

    /// 结果图像的输出路径。默认为载体旁的 `doctored_<文件名>.png`。
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// 允许覆盖已存在的输出文件。
    #[arg(short, long)]
    pub force: bool,
}

/// 'extract' 命令所需的参数。
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// 已隐藏数据的图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 解包输出目录。默认为图像旁的 `recovered_<文件名>` 目录。
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 允许写入已存在且非空的输出目录。
    #[arg(short, long)]
    pub force: bool,
}

/// 'capacity' 命令所需的参数。
#[derive(Args, Debug)]
pub struct CapacityArgs {
    /// 要查询的图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,
}
