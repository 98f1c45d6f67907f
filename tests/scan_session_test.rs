// ==========================================
// 扫码会话集成测试
// ==========================================
// 测试范围:
// 1. 首次解码采纳后立即失活，后续解码忽略
// 2. 权限/设备缺失终止会话，不自动重试
// 3. 用户取消
// 4. 表单接收扫码结果
// ==========================================


use best_before_tracker::api::{ApiError, EntryForm};
use best_before_tracker::capture::{
    CameraPermission, CaptureError, ScanOutcome, ScanSession, SimulatedCapture,
};
use best_before_tracker::domain::{BarcodeFormat, BarcodeResult};
use std::sync::Arc;

fn code(value: &str, format: BarcodeFormat) -> BarcodeResult {
    BarcodeResult::new(value, format)
}

#[tokio::test]
async fn test_scan_只采纳第一次解码() {
    let capture = SimulatedCapture::new().with_batches(vec![
        vec![code("4006381333931", BarcodeFormat::Ean13), code("123", BarcodeFormat::Qr)],
        vec![code("96385074", BarcodeFormat::Ean8)],
    ]);
    let session = ScanSession::new();

    let outcome = session.run(&capture).await.unwrap();
    assert_eq!(
        outcome,
        ScanOutcome::Scanned(code("4006381333931", BarcodeFormat::Ean13))
    );
    assert!(!session.is_active());
    assert!(!capture.is_active());

    // 会话结束后到达的回调不再被采纳
    assert_eq!(session.accept(&[code("96385074", BarcodeFormat::Ean8)]), None);
}

#[tokio::test]
async fn test_scan_空批次与空白值不结束会话() {
    let capture = SimulatedCapture::new().with_batches(vec![
        vec![],
        vec![code("   ", BarcodeFormat::Unknown)],
        vec![code("012345678905", BarcodeFormat::UpcA)],
    ]);
    let outcome = ScanSession::new().run(&capture).await.unwrap();
    assert_eq!(
        outcome,
        ScanOutcome::Scanned(code("012345678905", BarcodeFormat::UpcA))
    );
}

#[tokio::test]
async fn test_scan_并发突发回调只采纳一次() {
    let session = Arc::new(ScanSession::new());
    session.arm();

    let handles: Vec<_> = (0..32)
        .map(|i| {
            let session = session.clone();
            tokio::spawn(async move {
                session.accept(&[code(&format!("{:012}", i), BarcodeFormat::UpcA)])
            })
        })
        .collect();

    let mut accepted = 0;
    for handle in handles {
        if handle.await.unwrap().is_some() {
            accepted += 1;
        }
    }
    assert_eq!(accepted, 1);
    assert!(!session.is_active());
}

#[tokio::test]
async fn test_scan_权限拒绝终止会话() {
    let capture = SimulatedCapture::new().with_permission(CameraPermission::NotDetermined, false);
    let result = ScanSession::new().run(&capture).await;

    assert_eq!(result, Err(CaptureError::PermissionDenied));
    assert_eq!(capture.permission_request_count(), 1);
    assert_eq!(capture.activation_count(), 0);
}

#[tokio::test]
async fn test_scan_未确定权限自动请求一次() {
    let capture = SimulatedCapture::new()
        .with_permission(CameraPermission::NotDetermined, true)
        .with_code("4006381333931");
    let outcome = ScanSession::new().run(&capture).await.unwrap();

    assert!(matches!(outcome, ScanOutcome::Scanned(_)));
    assert_eq!(capture.permission_request_count(), 1);
}

#[tokio::test]
async fn test_scan_无设备终止会话() {
    let capture = SimulatedCapture::new().without_device();
    let result = ScanSession::new().run(&capture).await;

    assert_eq!(result, Err(CaptureError::DeviceUnavailable));
    assert_eq!(capture.activation_count(), 0);
}

#[tokio::test]
async fn test_scan_用户取消() {
    let capture = SimulatedCapture::new().keep_open();
    let session = ScanSession::new();

    let (outcome, _) = tokio::join!(session.run(&capture), async {
        tokio::task::yield_now().await;
        session.close();
    });

    assert_eq!(outcome.unwrap(), ScanOutcome::Cancelled);
    assert!(!capture.is_active());
}

#[tokio::test]
async fn test_scan_随机条码() {
    let capture = SimulatedCapture::new();
    match ScanSession::new().run(&capture).await.unwrap() {
        ScanOutcome::Scanned(result) => {
            assert_eq!(result.value.len(), 12);
            assert!(result.value.chars().all(|c| c.is_ascii_digit()));
        }
        other => panic!("Expected Scanned, got {:?}", other),
    }
}

#[tokio::test]
async fn test_form_扫码写入条码字段() {
    let mut form = EntryForm::new();
    let capture = SimulatedCapture::new().with_code(" 4006381333931 ");

    form.scan_with(&ScanSession::new(), &capture).await.unwrap();
    assert_eq!(form.barcode, "4006381333931");

    let denied = SimulatedCapture::new().with_permission(CameraPermission::Denied, false);
    let result = form.scan_with(&ScanSession::new(), &denied).await;
    assert!(matches!(
        result,
        Err(ApiError::CaptureUnavailable(CaptureError::PermissionDenied))
    ));
    assert_eq!(form.barcode, "4006381333931");
}
