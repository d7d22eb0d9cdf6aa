//! Bilingual (English / Arabic) user-facing text.
//!
//! Every string drawn by the UI goes through [`Language::text`] so that the
//! whole dashboard can be flipped between left-to-right English and
//! right-to-left Arabic at runtime.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The display language of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Language {
    /// English, laid out left-to-right.
    #[default]
    #[serde(rename = "en", alias = "english")]
    English,
    /// Arabic, laid out right-to-left.
    #[serde(rename = "ar", alias = "arabic")]
    Arabic,
}

impl Language {
    /// Whether this language is written right-to-left.
    pub fn is_rtl(self) -> bool {
        matches!(self, Language::Arabic)
    }

    /// Switch to the other language.
    pub fn toggle(self) -> Self {
        match self {
            Language::English => Language::Arabic,
            Language::Arabic => Language::English,
        }
    }

    /// ISO 639-1 code.
    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Arabic => "ar",
        }
    }

    /// Pick between an English and an Arabic variant.
    pub fn pick<'a>(self, en: &'a str, ar: &'a str) -> &'a str {
        match self {
            Language::English => en,
            Language::Arabic => ar,
        }
    }

    /// Translate a UI string.
    pub fn text(self, text: Text) -> &'static str {
        let (en, ar) = text.pair();
        self.pick(en, ar)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(Language::English),
            "ar" | "arabic" => Ok(Language::Arabic),
            other => Err(format!("unsupported language '{}' (expected en or ar)", other)),
        }
    }
}

/// Keys for translatable UI strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Text {
    AppTitle,
    Dashboard,
    Users,
    Restaurants,
    Orders,
    Categories,
    Coupons,
    Reports,
    Settings,
    Search,
    NoData,
    NoResults,
    Loading,
    Actions,
    Page,
    Of,
    Rows,
    PageSize,
    All,
    Login,
    Email,
    Password,
    SignIn,
    LoginHint,
    Create,
    Edit,
    View,
    Delete,
    ConfirmDelete,
    Confirm,
    Cancel,
    Save,
    Close,
    Created,
    Updated,
    Deleted,
    StatusChanged,
    SettingsSaved,
    SomethingWentWrong,
    Retry,
    Help,
    TotalUsers,
    TotalRestaurants,
    TotalOrders,
    TotalRevenue,
    PendingOrders,
    ActiveCoupons,
    RecentOrders,
    Revenue,
    AverageOrder,
    NewUsers,
    TopRestaurants,
    Period,
    ServerPage,
}

impl Text {
    fn pair(self) -> (&'static str, &'static str) {
        match self {
            Text::AppTitle => ("Souq Admin", "لوحة تحكم سوق"),
            Text::Dashboard => ("Dashboard", "لوحة التحكم"),
            Text::Users => ("Users", "المستخدمون"),
            Text::Restaurants => ("Restaurants", "المطاعم"),
            Text::Orders => ("Orders", "الطلبات"),
            Text::Categories => ("Categories", "التصنيفات"),
            Text::Coupons => ("Coupons", "الكوبونات"),
            Text::Reports => ("Reports", "التقارير"),
            Text::Settings => ("Settings", "الإعدادات"),
            Text::Search => ("Search", "بحث"),
            Text::NoData => ("No data to display", "لا توجد بيانات"),
            Text::NoResults => ("No results match your search", "لا توجد نتائج مطابقة"),
            Text::Loading => ("Loading...", "جار التحميل..."),
            Text::Actions => ("Actions", "الإجراءات"),
            Text::Page => ("Page", "صفحة"),
            Text::Of => ("of", "من"),
            Text::Rows => ("rows", "صفوف"),
            Text::PageSize => ("Rows per page", "عدد الصفوف"),
            Text::All => ("All", "الكل"),
            Text::Login => ("Login", "تسجيل الدخول"),
            Text::Email => ("Email", "البريد الإلكتروني"),
            Text::Password => ("Password", "كلمة المرور"),
            Text::SignIn => ("Sign in", "دخول"),
            Text::LoginHint => (
                "Tab: next field  Enter: sign in  Ctrl+L: language",
                "Tab: الحقل التالي  Enter: دخول  Ctrl+L: اللغة",
            ),
            Text::Create => ("Create", "إضافة"),
            Text::Edit => ("Edit", "تعديل"),
            Text::View => ("View", "عرض"),
            Text::Delete => ("Delete", "حذف"),
            Text::ConfirmDelete => (
                "Are you sure you want to delete this item?",
                "هل أنت متأكد من حذف هذا العنصر؟",
            ),
            Text::Confirm => ("Confirm", "تأكيد"),
            Text::Cancel => ("Cancel", "إلغاء"),
            Text::Save => ("Save", "حفظ"),
            Text::Close => ("Close", "إغلاق"),
            Text::Created => ("Created successfully", "تمت الإضافة بنجاح"),
            Text::Updated => ("Updated successfully", "تم التحديث بنجاح"),
            Text::Deleted => ("Deleted successfully", "تم الحذف بنجاح"),
            Text::StatusChanged => ("Status updated", "تم تحديث الحالة"),
            Text::SettingsSaved => ("Settings saved", "تم حفظ الإعدادات"),
            Text::SomethingWentWrong => ("Something went wrong", "حدث خطأ ما"),
            Text::Retry => ("Press 'r' to retry", "اضغط 'r' لإعادة المحاولة"),
            Text::Help => ("Help", "مساعدة"),
            Text::TotalUsers => ("Total users", "إجمالي المستخدمين"),
            Text::TotalRestaurants => ("Total restaurants", "إجمالي المطاعم"),
            Text::TotalOrders => ("Total orders", "إجمالي الطلبات"),
            Text::TotalRevenue => ("Total revenue", "إجمالي الإيرادات"),
            Text::PendingOrders => ("Pending orders", "طلبات معلقة"),
            Text::ActiveCoupons => ("Active coupons", "كوبونات فعالة"),
            Text::RecentOrders => ("Recent orders", "أحدث الطلبات"),
            Text::Revenue => ("Revenue", "الإيرادات"),
            Text::AverageOrder => ("Average order", "متوسط الطلب"),
            Text::NewUsers => ("New users", "مستخدمون جدد"),
            Text::TopRestaurants => ("Top restaurants", "أفضل المطاعم"),
            Text::Period => ("Period", "الفترة"),
            Text::ServerPage => ("Batch", "الدفعة"),
        }
    }
}
