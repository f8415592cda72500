//! Editable text inputs and the forms built from them.

use crate::api::models::{Book, BookInput, Credentials, Registration};
use crate::app::event::AuthKind;
use unicode_width::UnicodeWidthStr;

/// Single-line text editor. `cursor` is a byte offset into `text`.
/// `secret` fields start masked and can be revealed.
#[derive(Debug, Clone, Default)]
pub struct TextField {
    pub text: String,
    pub cursor: usize,
    pub masked: bool,
    pub secret: bool,
}

impl TextField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn masked() -> Self {
        Self {
            masked: true,
            secret: true,
            ..Self::default()
        }
    }

    pub fn with_text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            cursor: text.len(),
            masked: false,
            secret: false,
        }
    }

    pub fn insert_char(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn delete_back(&mut self) {
        if self.cursor > 0 {
            let prev = self.text[..self.cursor]
                .char_indices()
                .next_back()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.text.drain(prev..self.cursor);
            self.cursor = prev;
        }
    }

    pub fn delete_forward(&mut self) {
        if self.cursor < self.text.len() {
            let next = self.text[self.cursor..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor + i)
                .unwrap_or(self.text.len());
            self.text.drain(self.cursor..next);
        }
    }

    pub fn move_left(&mut self) {
        if self.cursor > 0 {
            self.cursor = self.text[..self.cursor]
                .char_indices()
                .next_back()
                .map(|(i, _)| i)
                .unwrap_or(0);
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.text.len() {
            self.cursor = self.text[self.cursor..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor + i)
                .unwrap_or(self.text.len());
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.text.len();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Show or hide a secret field's text. Plain fields are unaffected.
    pub fn toggle_reveal(&mut self) {
        if self.secret {
            self.masked = !self.masked;
        }
    }

    /// Text as it should appear on screen.
    pub fn display(&self) -> String {
        if self.masked {
            "•".repeat(self.text.chars().count())
        } else {
            self.text.clone()
        }
    }

    /// Terminal column of the cursor relative to the start of the text.
    pub fn cursor_column(&self) -> u16 {
        let before = &self.text[..self.cursor];
        let width = if self.masked {
            before.chars().count()
        } else {
            before.width()
        };
        width as u16
    }
}

#[derive(Debug, Clone)]
pub struct Field {
    pub label: &'static str,
    pub input: TextField,
}

/// An ordered set of fields with one of them focused.
#[derive(Debug, Clone)]
pub struct Form {
    pub fields: Vec<Field>,
    pub focus: usize,
}

impl Form {
    fn new(fields: Vec<Field>) -> Self {
        Self { fields, focus: 0 }
    }

    pub fn value(&self, idx: usize) -> &str {
        self.fields.get(idx).map(|f| f.input.text.as_str()).unwrap_or("")
    }

    pub fn focused_mut(&mut self) -> Option<&mut TextField> {
        self.fields.get_mut(self.focus).map(|f| &mut f.input)
    }

    pub fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
        }
    }

    pub fn focus_prev(&mut self) {
        if !self.fields.is_empty() {
            self.focus = if self.focus == 0 {
                self.fields.len() - 1
            } else {
                self.focus - 1
            };
        }
    }

    pub fn clear(&mut self) {
        for f in &mut self.fields {
            f.input.clear();
            f.input.masked = f.input.secret;
        }
        self.focus = 0;
    }

    pub fn toggle_secrets(&mut self) {
        for f in &mut self.fields {
            f.input.toggle_reveal();
        }
    }

    /// Whether any secret field is currently shown in clear text.
    pub fn secrets_revealed(&self) -> bool {
        self.fields.iter().any(|f| f.input.secret && !f.input.masked)
    }
}

fn field(label: &'static str, input: TextField) -> Field {
    Field { label, input }
}

/// Login or registration form. `loading` disables resubmission while the
/// request is outstanding.
#[derive(Debug, Clone)]
pub struct AuthForm {
    pub kind: AuthKind,
    pub form: Form,
    pub loading: bool,
    pub error: Option<String>,
}

impl AuthForm {
    pub fn login() -> Self {
        Self {
            kind: AuthKind::Login,
            form: Form::new(vec![
                field("Email", TextField::new()),
                field("Password", TextField::masked()),
            ]),
            loading: false,
            error: None,
        }
    }

    pub fn register() -> Self {
        Self {
            kind: AuthKind::Register,
            form: Form::new(vec![
                field("Name", TextField::new()),
                field("Email", TextField::new()),
                field("Password", TextField::masked()),
            ]),
            loading: false,
            error: None,
        }
    }

    pub fn credentials(&self) -> Credentials {
        Credentials {
            email: self.form.value(0).trim().to_string(),
            password: self.form.value(1).to_string(),
        }
    }

    pub fn registration(&self) -> Registration {
        Registration {
            name: self.form.value(0).trim().to_string(),
            email: self.form.value(1).trim().to_string(),
            password: self.form.value(2).to_string(),
        }
    }

    pub fn reset(&mut self) {
        self.form.clear();
        self.loading = false;
        self.error = None;
    }
}

/// Title / author / year editor behind the add and edit dialog.
#[derive(Debug, Clone)]
pub struct BookForm {
    pub form: Form,
}

impl BookForm {
    pub fn empty() -> Self {
        Self::build("", "", "")
    }

    pub fn from_book(book: &Book) -> Self {
        let year = book.publication_year.map(|y| y.to_string()).unwrap_or_default();
        Self::build(&book.title, &book.author, &year)
    }

    fn build(title: &str, author: &str, year: &str) -> Self {
        Self {
            form: Form::new(vec![
                field("Title", TextField::with_text(title)),
                field("Author", TextField::with_text(author)),
                field("Publication year", TextField::with_text(year)),
            ]),
        }
    }

    pub fn input(&self) -> BookInput {
        BookInput::new(self.form.value(0), self.form.value(1), self.form.value(2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_field_edits_multibyte_text() {
        let mut f = TextField::new();
        for c in "héllo".chars() {
            f.insert_char(c);
        }
        f.move_left();
        f.move_left();
        f.delete_back();
        assert_eq!(f.text, "hélo");
        f.move_home();
        f.delete_forward();
        assert_eq!(f.text, "élo");
        f.move_end();
        assert_eq!(f.cursor, f.text.len());
    }

    #[test]
    fn masked_field_hides_text() {
        let mut f = TextField::masked();
        f.insert_char('a');
        f.insert_char('b');
        assert_eq!(f.display(), "••");
        assert_eq!(f.cursor_column(), 2);
    }

    #[test]
    fn password_can_be_revealed_and_hidden_again() {
        let mut login = AuthForm::login();
        login.form.fields[1].input.insert_char('p');
        login.form.toggle_secrets();
        assert_eq!(login.form.fields[1].input.display(), "p");
        assert!(login.form.secrets_revealed());
        // the email field is never masked
        assert!(!login.form.fields[0].input.masked);

        login.reset();
        assert!(login.form.fields[1].input.masked);
        assert!(!login.form.secrets_revealed());
    }

    #[test]
    fn form_focus_wraps() {
        let mut login = AuthForm::login();
        login.form.focus_prev();
        assert_eq!(login.form.focus, 1);
        login.form.focus_next();
        assert_eq!(login.form.focus, 0);
    }

    #[test]
    fn auth_forms_extract_their_payloads() {
        let mut reg = AuthForm::register();
        reg.form.fields[0].input = TextField::with_text(" Ada ");
        reg.form.fields[1].input = TextField::with_text("ada@example.com");
        reg.form.fields[2].input = TextField::with_text(" secret ");
        let r = reg.registration();
        assert_eq!(r.name, "Ada");
        assert_eq!(r.email, "ada@example.com");
        // passwords are sent untouched
        assert_eq!(r.password, " secret ");
    }

    #[test]
    fn book_form_prefills_from_book() {
        let book = Book {
            id: "1".into(),
            title: "Dune".into(),
            author: "Frank Herbert".into(),
            publication_year: Some(1965),
        };
        let form = BookForm::from_book(&book);
        assert_eq!(form.form.value(0), "Dune");
        assert_eq!(form.form.value(2), "1965");
        assert_eq!(form.input(), BookInput::new("Dune", "Frank Herbert", "1965"));
    }
}
