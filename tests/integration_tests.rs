use image::{ImageBuffer, Rgba, RgbaImage};
use lsb_stash::{
    StegoError,
    bits::bytes_to_bits,
    capacity::capacity_bits,
    cli::{EmbedArgs, ExtractArgs},
    handler::{handle_embed, handle_extract},
    header,
    pipeline::{embed_path, extract_path},
    steganography::{build_frame, embed, extract, hide},
};
use rand::{Rng, RngCore};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// 生成一个带有随机像素 (含随机 alpha) 的测试图像
fn random_image(width: u32, height: u32) -> RgbaImage {
    let mut img_buf = ImageBuffer::new(width, height);
    let mut raw_pixels = vec![0u8; (width * height * 4) as usize];
    rand::rng().fill_bytes(&mut raw_pixels);

    img_buf
        .pixels_mut()
        .zip(raw_pixels.chunks_exact(4))
        .for_each(|(pixel, chunk): (&mut Rgba<u8>, &[u8])| {
            *pixel = Rgba([chunk[0], chunk[1], chunk[2], chunk[3]]);
        });

    img_buf
}

/// 一个辅助函数，用于创建一个带有随机像素的测试图像文件
fn create_test_image(path: &Path, width: u32, height: u32) {
    random_image(width, height)
        .save(path)
        .expect("Failed to create test image.");
}

/// 创建一个包含嵌套目录、空目录和二进制文件的待隐藏目录
fn create_source_tree(root: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(root.join("docs/drafts"))?;
    fs::create_dir_all(root.join("empty"))?;
    fs::write(root.join("readme.txt"), "top level file")?;
    fs::write(root.join("docs/drafts/plan.md"), "# plan\n这是一个测试。")?;

    let mut blob = vec![0u8; 777];
    rand::rng().fill_bytes(&mut blob);
    fs::write(root.join("docs/blob.bin"), blob)?;
    Ok(())
}

fn assert_same_file(a: &Path, b: &Path) -> anyhow::Result<()> {
    assert_eq!(fs::read(a)?, fs::read(b)?, "{a:?} differs from {b:?}");
    Ok(())
}

/// 验证从隐藏到恢复整个目录树的完整流程
#[test]
fn test_directory_embed_and_extract_integration() -> anyhow::Result<()> {
    // 1. 准备环境
    let dir = tempdir()?;
    let carrier = dir.path().join("carrier.png");
    let stego = dir.path().join("out/stego.png");
    let source = dir.path().join("secret");
    let restored = dir.path().join("restored");

    create_test_image(&carrier, 120, 120);
    create_source_tree(&source)?;

    // 2. 嵌入
    let report = embed_path(&carrier, &source, &stego)?;
    assert!(stego.exists(), "Stego image should be created.");
    assert_eq!(report.frame_bits, 32 + 8 * report.payload_bytes as u64);
    assert_eq!(report.capacity_bits, 120 * 120 * 3);

    // 3. 提取
    let extracted = extract_path(&stego, &restored)?;
    assert_eq!(extracted.payload_bytes, report.payload_bytes);

    // 4. 验证结果
    for file in ["readme.txt", "docs/drafts/plan.md", "docs/blob.bin"] {
        assert_same_file(&source.join(file), &restored.join(file))?;
    }
    assert!(restored.join("empty").is_dir());

    Ok(())
}

/// 验证单个文件的隐藏与恢复，以及 alpha 通道在磁盘往返后保持不变
#[test]
fn test_single_file_keeps_alpha() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let carrier = dir.path().join("carrier.png");
    let stego = dir.path().join("stego.png");
    let source = dir.path().join("message.txt");
    let restored = dir.path().join("restored");

    create_test_image(&carrier, 60, 60);
    fs::write(&source, "This is a test message! 这是一个测试信息！")?;

    embed_path(&carrier, &source, &stego)?;
    extract_path(&stego, &restored)?;
    assert_same_file(&source, &restored.join("message.txt"))?;

    let before = image::open(&carrier)?.to_rgba8();
    let after = image::open(&stego)?.to_rgba8();
    for (old, new) in before.pixels().zip(after.pixels()) {
        assert_eq!(old[3], new[3], "alpha must never change");
        for c in 0..3 {
            assert_eq!(old[c] & 0xFE, new[c] & 0xFE, "only the LSB may change");
        }
    }

    Ok(())
}

/// 验证当用户不提供输出路径时，是否能正确生成默认路径并完成操作
#[test]
fn test_handle_embed_and_extract_with_defaults() -> anyhow::Result<()> {
    // 1. 准备环境
    let dir = tempdir()?;
    let original_image_path = dir.path().join("original.png");
    let source_text_path = dir.path().join("source.txt");

    create_test_image(&original_image_path, 100, 100);
    let original_text = "Testing default path generation. 测试默认路径生成。";
    fs::write(&source_text_path, original_text)?;

    // 2. 测试 handle_embed，不提供 dest 路径
    handle_embed(EmbedArgs {
        image: original_image_path.clone(),
        source: source_text_path.clone(),
        dest: None,
        force: false,
    })?;

    let expected_hidden_path = dir.path().join("doctored_original.png");
    assert!(
        expected_hidden_path.exists(),
        "Default hidden image should be created at: {:?}",
        expected_hidden_path
    );

    // 3. 测试 handle_extract，不提供输出目录
    handle_extract(ExtractArgs {
        image: expected_hidden_path,
        output: None,
        force: false,
    })?;

    let expected_recovered_path = dir.path().join("recovered_doctored_original/source.txt");
    assert!(
        expected_recovered_path.exists(),
        "Default recovered file should be created at: {:?}",
        expected_recovered_path
    );

    // 4. 验证结果
    assert_eq!(fs::read_to_string(&expected_recovered_path)?, original_text);

    Ok(())
}

/// 验证覆盖保护机制以及 `--force` 标志是否按预期工作
#[test]
fn test_overwrite_protection_and_force_flag() -> anyhow::Result<()> {
    // 1. 准备环境
    let dir = tempdir()?;
    let image_path = dir.path().join("image.png");
    let text_path = dir.path().join("text.txt");
    let dest_path = dir.path().join("dest.png");

    create_test_image(&image_path, 50, 50);
    fs::write(&text_path, "some text")?;

    // 2. 场景一：先创建一个同名的目标文件，不使用 --force 时应失败
    fs::write(&dest_path, "this is a dummy file to be overwritten")?;

    let result = handle_embed(EmbedArgs {
        image: image_path.clone(),
        source: text_path.clone(),
        dest: Some(dest_path.clone()),
        force: false,
    });
    assert!(result.is_err(), "Execution should fail without --force when file exists.");
    if let Err(e) = result {
        assert!(e.to_string().contains("Output file already exists"));
    }

    // 3. 场景二：使用 --force 时应成功覆盖
    handle_embed(EmbedArgs {
        image: image_path.clone(),
        source: text_path.clone(),
        dest: Some(dest_path.clone()),
        force: true,
    })?;
    assert_ne!(fs::read(&dest_path)?, b"this is a dummy file to be overwritten");

    // 4. 场景三：提取到非空目录需要 --force
    let out_dir = dir.path().join("busy");
    fs::create_dir_all(&out_dir)?;
    fs::write(out_dir.join("keep.txt"), "already here")?;

    let result = handle_extract(ExtractArgs {
        image: dest_path.clone(),
        output: Some(out_dir.clone()),
        force: false,
    });
    assert!(result.is_err());
    if let Err(e) = result {
        assert!(e.to_string().contains("not empty"));
    }

    handle_extract(ExtractArgs {
        image: dest_path,
        output: Some(out_dir.clone()),
        force: true,
    })?;
    assert_eq!(fs::read_to_string(out_dir.join("text.txt"))?, "some text");
    assert_eq!(fs::read_to_string(out_dir.join("keep.txt"))?, "already here");

    Ok(())
}

/// 验证空间不足时的错误处理：报错且不写出任何文件
#[test]
fn test_embed_not_enough_space() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("small.png");
    let source_path = dir.path().join("large.bin");
    let dest_path = dir.path().join("dest.png");

    // 创建一个非常小的图片和无法压缩的大文件
    create_test_image(&image_path, 10, 10);
    let mut noise = vec![0u8; 5000];
    rand::rng().fill_bytes(&mut noise);
    fs::write(&source_path, noise)?;

    let result = handle_embed(EmbedArgs {
        image: image_path,
        source: source_path,
        dest: Some(dest_path.clone()),
        force: false,
    });

    let err = result.expect_err("embedding should fail");
    assert!(matches!(
        err.downcast_ref::<StegoError>(),
        Some(StegoError::InsufficientCapacity { capacity: 300, .. })
    ));
    assert!(format!("{err:#}").contains("Not enough space"));
    assert!(!dest_path.exists(), "No output may be written on failure.");

    Ok(())
}

/// 验证源路径不存在和载体不是图像时的错误
#[test]
fn test_missing_source_and_bad_carrier() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let carrier = dir.path().join("carrier.png");
    let not_image = dir.path().join("fake.png");
    let source = dir.path().join("payload.txt");
    create_test_image(&carrier, 20, 20);
    fs::write(&not_image, "plain text, not pixels")?;
    fs::write(&source, "x")?;

    let err = embed_path(&carrier, &dir.path().join("nope"), &dir.path().join("o.png"))
        .expect_err("missing source must fail");
    assert!(err.to_string().contains("archive source"));

    let err = embed_path(&not_image, &source, &dir.path().join("o.png"))
        .expect_err("bad carrier must fail");
    assert!(err.to_string().contains("carrier image"));

    let err = extract_path(&not_image, &dir.path().join("out")).expect_err("bad image must fail");
    assert!(err.to_string().contains("load image"));

    Ok(())
}

/// 未隐藏数据的图像：头部被解读为随机长度，必须报错而不是写出垃圾
#[test]
fn test_extract_from_untouched_image_writes_nothing() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("plain.png");
    let out = dir.path().join("out");

    // 所有最低位为 1，头部解码为 u32::MAX
    RgbaImage::from_pixel(16, 16, Rgba([255, 255, 255, 255])).save(&image_path)?;

    let err = extract_path(&image_path, &out).expect_err("extraction must fail");
    assert!(err.to_string().contains("payload"));
    assert!(matches!(
        err.downcast_ref::<StegoError>(),
        Some(StegoError::IncompletePayload { .. })
    ));
    assert!(!out.exists());

    Ok(())
}

/// 2×2 图像无法容纳 1 字节负载加 4 字节头部
#[test]
fn test_two_by_two_reports_required_and_capacity() {
    let mut image = random_image(2, 2);
    let before = image.clone();

    let err = hide(&mut image, &[0x41]).unwrap_err();
    assert!(matches!(
        err,
        StegoError::InsufficientCapacity {
            required: 40,
            capacity: 12
        }
    ));
    assert_eq!(image, before);
}

/// 4×4 图像：40 个比特写入前 13 个像素和第 14 个像素的红色通道，其余保持原样
#[test]
fn test_four_by_four_uses_exactly_forty_bits() {
    let mut image = random_image(4, 4);
    let before = image.clone();

    hide(&mut image, &[0x41]).unwrap();

    let frame = build_frame(&[0x41]).unwrap();
    let written: Vec<bool> = image
        .pixels()
        .flat_map(|p| [p[0] & 1 == 1, p[1] & 1 == 1, p[2] & 1 == 1])
        .take(40)
        .collect();
    assert_eq!(written, frame);

    let pixels_before: Vec<_> = before.pixels().collect();
    let pixels_after: Vec<_> = image.pixels().collect();

    // 第 14 个像素 (索引 13)：只有红色通道承载第 40 个比特
    assert_eq!(pixels_after[13][1], pixels_before[13][1]);
    assert_eq!(pixels_after[13][2], pixels_before[13][2]);
    // 之后的像素完全未被触及
    assert_eq!(pixels_after[14..], pixels_before[14..]);
    // alpha 始终不变
    for (a, b) in pixels_before.iter().zip(&pixels_after) {
        assert_eq!(a[3], b[3]);
    }

    assert_eq!(extract(&image).unwrap(), vec![0x41]);
}

/// 容量边界：恰好填满时成功并用到最后一个像素的全部三个通道，多一个比特就失败且图像不变
#[test]
fn test_capacity_boundary() {
    // 8×4 = 32 像素 = 96 比特 = 32 头部比特 + 8 字节负载
    let payload: Vec<u8> = (0..8).map(|i| 0xA5 ^ i).collect();
    let mut image = random_image(8, 4);
    assert_eq!(capacity_bits(8, 4), 32 + 8 * payload.len() as u64);

    hide(&mut image, &payload).unwrap();
    let last = image.get_pixel(7, 3);
    let frame = build_frame(&payload).unwrap();
    assert_eq!(
        [last[0] & 1 == 1, last[1] & 1 == 1, last[2] & 1 == 1],
        [frame[93], frame[94], frame[95]]
    );
    assert_eq!(extract(&image).unwrap(), payload);

    // 多一个比特
    let mut image = random_image(8, 4);
    let before = image.clone();
    let mut frame = build_frame(&payload).unwrap();
    frame.push(true);
    let err = embed(&mut image, &frame).unwrap_err();
    assert!(matches!(
        err,
        StegoError::InsufficientCapacity {
            required: 97,
            capacity: 96
        }
    ));
    assert_eq!(image, before);
}

/// 随机负载与随机尺寸的嵌入/提取往返
#[test]
fn test_random_round_trips() {
    let mut rng = rand::rng();
    for _ in 0..25 {
        let width = rng.random_range(4..40);
        let height = rng.random_range(4..40);
        let max = (capacity_bits(width, height) - 32) / 8;
        let len = rng.random_range(0..=max) as usize;

        let mut payload = vec![0u8; len];
        rng.fill_bytes(&mut payload);

        let mut image = random_image(width, height);
        hide(&mut image, &payload).unwrap();
        assert_eq!(extract(&image).unwrap(), payload);
    }
}

/// 头部声明的长度超出图像容量时，提取失败而不是截断
#[test]
fn test_malformed_header_is_incomplete_payload() {
    let mut image = random_image(10, 10);
    let mut frame = header::encode(1_000);
    frame.extend(bytes_to_bits(b"short"));
    embed(&mut image, &frame).unwrap();

    match extract(&image) {
        Err(StegoError::IncompletePayload { read, expected }) => {
            assert_eq!(read, 300);
            assert_eq!(expected, 32 + 8_000);
        }
        other => panic!("unexpected result: {other:?}"),
    }
}
