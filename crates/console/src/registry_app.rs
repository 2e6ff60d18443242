use std::path::PathBuf;

use anyhow::Result;
use tracing::{info, warn};
use vethub_core::{
    models::STATUS_LABELS,
    registry::{load_veterans, parse_number, save_veterans},
    NewVeteran, Registry, Veteran, VeteranEdit,
};

use crate::{
    console::{is_input_closed, print_or_log, Console},
    logging::logged,
};

/// Interactive front-end for the veteran registry.
pub struct RegistryApp<C> {
    console: C,
    path: PathBuf,
    registry: Registry,
}

impl<C: Console> RegistryApp<C> {
    pub fn load(mut console: C, path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let report = logged("load_veterans", || load_veterans(&path));
        if let Some(err) = &report.failure {
            console.print_line(&format!(
                "❌ Не вдалося прочитати {}: {err:#}",
                path.display()
            ))?;
            if let Some(copy) = &report.quarantined {
                console.print_line(&format!("Копію файлу збережено як {}", copy.display()))?;
            }
        }
        for skipped in &report.skipped {
            console.print_line(&format!(
                "Попередження: пропущено запис #{}: {}",
                skipped.index + 1,
                skipped.error
            ))?;
        }

        let registry = Registry::new(report.records);
        info!(count = registry.len(), path = %path.display(), "registry ready");
        Ok(Self {
            console,
            path,
            registry,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Run the menu until the operator exits or input ends, then save the registry.
    ///
    /// The registry is saved on every way out of the menu; a menu error is returned
    /// after the save has been attempted.
    pub fn run(&mut self) -> Result<()> {
        let outcome = match self.menu() {
            Err(err) if is_input_closed(&err) => {
                info!("input closed, leaving registry");
                Ok(())
            }
            other => other,
        };
        let saved = self.save_on_exit();
        outcome?;
        saved
    }

    fn menu(&mut self) -> Result<()> {
        loop {
            for line in [
                "",
                "--- МЕНЮ ---",
                "1. Додати ветерана",
                "2. Показати всіх",
                "3. Пошук за регіоном",
                "4. Видалити за ID",
                "5. Пошук за ім'ям",
                "6. Пошук за статусом",
                "7. Фільтр за віком",
                "8. Редагувати запис",
                "0. Вихід",
                "",
            ] {
                self.console.print_line(line)?;
            }

            let choice = self.console.read_line("Оберіть дію: ")?;
            match choice.trim() {
                "1" => logged("add_veteran", || self.add())?,
                "2" => logged("list_veterans", || self.list())?,
                "3" => logged("find_by_region", || self.find_by_region())?,
                "4" => logged("delete_veteran", || self.delete())?,
                "5" => logged("find_by_name", || self.find_by_name())?,
                "6" => logged("find_by_status", || self.find_by_status())?,
                "7" => logged("filter_by_age", || self.filter_by_age())?,
                "8" => logged("edit_veteran", || self.edit())?,
                "0" => return Ok(()),
                other => {
                    warn!(command = other, "unknown registry command");
                    self.console.print_line("❌ Невірна команда")?;
                }
            }
        }
    }

    fn add(&mut self) -> Result<()> {
        let name = self.console.read_line("Ім'я та прізвище: ")?;
        let age = match parse_number("age", &self.console.read_line("Вік: ")?) {
            Ok(age) => age,
            Err(err) => {
                warn!("rejected new veteran: {err}");
                return self
                    .console
                    .print_line("❌ Помилка введення. Спробуйте ще раз.");
            }
        };
        let status = self
            .console
            .read_line(&format!("Статус ({}): ", status_hint()))?;
        let region = self.console.read_line("Регіон проживання: ")?;

        let added = self.registry.add(NewVeteran {
            name,
            age,
            status,
            region,
        });
        match added {
            Ok(veteran) => {
                info!(veteran_id = veteran.veteran_id, "veteran added");
                self.console.print_line("✔ Додано успішно!")
            }
            Err(err) => {
                warn!("rejected new veteran: {err}");
                self.console.print_line("❌ Не вдалося призначити ID новому запису.")
            }
        }
    }

    fn list(&mut self) -> Result<()> {
        for veteran in self.registry.list() {
            self.console.print_line(&veteran.to_string())?;
        }
        Ok(())
    }

    fn find_by_region(&mut self) -> Result<()> {
        let region = self.console.read_line("Введіть регіон: ")?;
        let found = self.registry.find_by_region(&region);
        show_found(&mut self.console, &found)
    }

    fn find_by_name(&mut self) -> Result<()> {
        let name = self.console.read_line("Введіть ім'я або прізвище: ")?;
        let found = self.registry.find_by_name(&name);
        show_found(&mut self.console, &found)
    }

    fn find_by_status(&mut self) -> Result<()> {
        let status = self
            .console
            .read_line(&format!("Введіть статус ({}): ", status_hint()))?;
        let found = self.registry.find_by_status(&status);
        show_found(&mut self.console, &found)
    }

    fn filter_by_age(&mut self) -> Result<()> {
        let raw = self.console.read_line("Мінімальний вік: ")?;
        let Ok(min_age) = parse_number::<i64>("min_age", &raw) else {
            return self.console.print_line("❌ Вік має бути числом.");
        };
        let raw = self.console.read_line("Максимальний вік: ")?;
        let Ok(max_age) = parse_number::<i64>("max_age", &raw) else {
            return self.console.print_line("❌ Вік має бути числом.");
        };

        let found = self.registry.filter_by_age(min_age, max_age);
        show_found(&mut self.console, &found)
    }

    fn delete(&mut self) -> Result<()> {
        let raw = self.console.read_line("Введіть ID для видалення: ")?;
        let Ok(veteran_id) = parse_number::<u64>("veteran_id", &raw) else {
            return self.console.print_line("❌ Некоректне значення.");
        };

        if self.registry.delete(veteran_id) {
            info!(veteran_id, "veteran deleted");
            self.console.print_line("✔ Видалено.")
        } else {
            self.console.print_line("❌ Не знайдено ID.")
        }
    }

    fn edit(&mut self) -> Result<()> {
        let raw = self.console.read_line("Введіть ID для редагування: ")?;
        let Ok(veteran_id) = parse_number::<u64>("veteran_id", &raw) else {
            return self.console.print_line("❌ Некоректне значення.");
        };
        let Some(current) = self.registry.get(veteran_id).cloned() else {
            return self.console.print_line("❌ Не знайдено ID.");
        };

        self.console
            .print_line("Залиште поле порожнім, щоб не змінювати значення")?;
        let name = self
            .console
            .read_line(&format!("Ім'я та прізвище ({}): ", current.name))?;
        let age = self.console.read_line(&format!("Вік ({}): ", current.age))?;
        let status = self
            .console
            .read_line(&format!("Статус ({}): ", current.status))?;
        let region = self
            .console
            .read_line(&format!("Регіон ({}): ", current.region))?;

        let edit = match VeteranEdit::parse(&name, &age, &status, &region) {
            Ok(edit) => edit,
            Err(err) => {
                warn!(veteran_id, "rejected edit: {err}");
                return self.console.print_line("❌ Некоректне значення.");
            }
        };
        match self.registry.edit(veteran_id, edit) {
            Ok(_) => {
                info!(veteran_id, "veteran updated");
                self.console.print_line("✔ Запис оновлено.")
            }
            Err(err) => {
                warn!("{err}");
                self.console.print_line("❌ Не знайдено ID.")
            }
        }
    }

    fn save_on_exit(&mut self) -> Result<()> {
        loop {
            match save_veterans(self.registry.list(), &self.path) {
                Ok(()) => {
                    print_or_log(&mut self.console, "Збережено. До зустрічі!");
                    return Ok(());
                }
                Err(err) => {
                    let message = format!("❌ Не вдалося зберегти дані: {err:#}");
                    print_or_log(&mut self.console, &message);
                    match self.console.confirm("Повторити збереження? (т/н): ") {
                        Ok(true) => continue,
                        Ok(false) => {}
                        Err(confirm_err) if is_input_closed(&confirm_err) => {}
                        Err(confirm_err) => return Err(confirm_err),
                    }
                    return Err(err.context("registry changes were not saved"));
                }
            }
        }
    }
}

fn status_hint() -> String {
    STATUS_LABELS.join("/")
}

fn show_found<C: Console>(console: &mut C, found: &[&Veteran]) -> Result<()> {
    if found.is_empty() {
        return console.print_line("❌ Не знайдено.");
    }
    for veteran in found {
        console.print_line(&veteran.summary())?;
    }
    Ok(())
}
