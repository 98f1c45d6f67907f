// ==========================================
// 保质期追踪 - 模拟扫码能力
// ==========================================
// 用途: 无相机环境（命令行/测试）下替代真实扫码
// 模式: 预置解码批次；未预置时生成随机 12 位条码
// ==========================================

use crate::capture::session::{BarcodeCapture, CameraPermission};
use crate::domain::barcode::{BarcodeFormat, BarcodeResult, DecodeBatch};
use async_trait::async_trait;
use futures::stream::{self, BoxStream};
use futures::StreamExt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

/// 模拟扫码后预填的商品名称
pub const SIMULATED_PRODUCT_NAME: &str = "Scanned Product";

/// 模拟扫码后预填的分类
pub const SIMULATED_CATEGORY: &str = "Food";

#[derive(Debug)]
pub struct SimulatedCapture {
    permission: Mutex<CameraPermission>,
    grant_on_request: bool,
    device_present: bool,
    keep_open: bool,
    batches: Mutex<Vec<DecodeBatch>>,
    active: AtomicBool,
    activations: AtomicUsize,
    permission_requests: AtomicUsize,
}

impl Default for SimulatedCapture {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedCapture {
    /// 已授权、有设备、随机条码
    pub fn new() -> Self {
        Self {
            permission: Mutex::new(CameraPermission::Granted),
            grant_on_request: true,
            device_present: true,
            keep_open: false,
            batches: Mutex::new(Vec::new()),
            active: AtomicBool::new(false),
            activations: AtomicUsize::new(0),
            permission_requests: AtomicUsize::new(0),
        }
    }

    /// 预置解码批次（按顺序回调）
    pub fn with_batches(self, batches: Vec<DecodeBatch>) -> Self {
        Self {
            batches: Mutex::new(batches),
            ..self
        }
    }

    /// 预置单个条码
    pub fn with_code(self, value: &str) -> Self {
        self.with_batches(vec![vec![BarcodeResult::new(value, BarcodeFormat::Unknown)]])
    }

    pub fn with_permission(self, permission: CameraPermission, grant_on_request: bool) -> Self {
        Self {
            permission: Mutex::new(permission),
            grant_on_request,
            ..self
        }
    }

    pub fn without_device(self) -> Self {
        Self {
            device_present: false,
            ..self
        }
    }

    /// 批次耗尽后保持流打开（等待用户取消）
    pub fn keep_open(self) -> Self {
        Self {
            keep_open: true,
            ..self
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    pub fn activation_count(&self) -> usize {
        self.activations.load(Ordering::Acquire)
    }

    pub fn permission_request_count(&self) -> usize {
        self.permission_requests.load(Ordering::Acquire)
    }

    fn current_permission(&self) -> CameraPermission {
        match self.permission.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    fn take_batches(&self) -> Vec<DecodeBatch> {
        let mut guard = match self.batches.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        std::mem::take(&mut *guard)
    }
}

/// 随机 12 位数字条码（UPC-A 长度）
pub fn random_barcode() -> String {
    let n = Uuid::new_v4().as_u128() % 1_000_000_000_000;
    format!("{:012}", n)
}

#[async_trait]
impl BarcodeCapture for SimulatedCapture {
    async fn permission_status(&self) -> CameraPermission {
        self.current_permission()
    }

    async fn request_permission(&self) -> CameraPermission {
        self.permission_requests.fetch_add(1, Ordering::AcqRel);
        let mut guard = match self.permission.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if self.grant_on_request {
            *guard = CameraPermission::Granted;
        } else if *guard == CameraPermission::NotDetermined {
            *guard = CameraPermission::Denied;
        }
        *guard
    }

    fn has_device(&self) -> bool {
        self.device_present
    }

    fn activate(&self) -> BoxStream<'static, DecodeBatch> {
        self.active.store(true, Ordering::Release);
        self.activations.fetch_add(1, Ordering::AcqRel);

        let mut batches = self.take_batches();
        if batches.is_empty() && !self.keep_open {
            batches.push(vec![BarcodeResult::new(random_barcode(), BarcodeFormat::UpcA)]);
        }

        let feed = stream::iter(batches);
        if self.keep_open {
            feed.chain(stream::pending()).boxed()
        } else {
            feed.boxed()
        }
    }

    fn deactivate(&self) {
        self.active.store(false, Ordering::Release);
    }
}
