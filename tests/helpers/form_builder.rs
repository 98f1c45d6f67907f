// ==========================================
// 录入表单构建器 - 用于集成测试
// ==========================================

#![allow(dead_code)]

use best_before_tracker::api::EntryForm;
use best_before_tracker::domain::StorageLocation;

pub struct FormBuilder {
    form: EntryForm,
}

impl FormBuilder {
    pub fn new(name: &str, expiry_date: &str) -> Self {
        Self {
            form: EntryForm {
                name: name.to_string(),
                expiry_date: expiry_date.to_string(),
                ..EntryForm::default()
            },
        }
    }

    pub fn category(mut self, category: &str) -> Self {
        self.form.category = category.to_string();
        self
    }

    pub fn location(mut self, location: StorageLocation) -> Self {
        self.form.location = location;
        self
    }

    pub fn barcode(mut self, barcode: &str) -> Self {
        self.form.barcode = barcode.to_string();
        self
    }

    pub fn build(self) -> EntryForm {
        self.form
    }
}
