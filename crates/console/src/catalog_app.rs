use anyhow::{anyhow, Result};
use tracing::{info, warn};
use vethub_core::{
    catalog::ResourceLoad,
    models::{EducationProgram, JobPosting, LegalAid, PsychologistContact, SocialGroup},
    Catalog, CatalogError, CatalogStore, Category, Resource, ResourceKind,
};

use crate::{
    console::{is_input_closed, print_or_log, Console},
    logging::logged,
};

const RULE: &str = "----------------------------------------";
const SHORT_RULE: &str = "--------------------";
const BANNER: &str = "========================================";

/// Interactive front-end for the resource catalog.
pub struct CatalogApp<C> {
    console: C,
    store: CatalogStore,
    catalog: Catalog,
}

impl<C: Console> CatalogApp<C> {
    /// Load every category from `store` and report what happened to the operator.
    pub fn load(mut console: C, store: CatalogStore) -> Result<Self> {
        console.print_line("Завантаження даних...")?;
        let (catalog, reports) = store.load_all();
        for (category, report) in &reports {
            report_load(&mut console, &store, *category, report)?;
        }
        console.print_line("Ініціалізація даних завершена.")?;
        info!(total = catalog.len(), root = %store.root().display(), "catalog ready");

        Ok(Self {
            console,
            store,
            catalog,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Run the main menu until the operator exits or input ends, then save everything.
    ///
    /// The catalog is saved on every way out of the menu; a menu error is returned
    /// after the save has been attempted.
    pub fn run(&mut self) -> Result<()> {
        let outcome = match self.main_menu() {
            Err(err) if is_input_closed(&err) => {
                info!("input closed, leaving catalog");
                Ok(())
            }
            other => other,
        };
        let saved = self.save_on_exit();
        outcome?;
        saved
    }

    fn main_menu(&mut self) -> Result<()> {
        loop {
            logged("display_main_menu", || self.show_main_menu())?;
            let choice: u32 = self.console.prompt_number("Ваш вибір: ")?;
            match choice {
                1..=5 => {
                    let category = Category::ALL[(choice - 1) as usize];
                    logged("handle_category_choice", || self.category_menu(category))?;
                }
                6 => logged("add_new_resource", || self.add_menu())?,
                0 => {
                    self.console.clear()?;
                    self.console.print_line(BANNER)?;
                    self.console
                        .print_line("  Дякуємо за використання 'Навігатора Переходу'!")?;
                    self.console.print_line("         До побачення!         ")?;
                    self.console.print_line(BANNER)?;
                    return Ok(());
                }
                _ => {
                    self.console
                        .print_line("Невірний вибір. Будь ласка, введіть число від 0 до 6.")?;
                    self.console.pause()?;
                }
            }
        }
    }

    fn show_main_menu(&mut self) -> Result<()> {
        self.console.clear()?;
        for line in [
            BANNER,
            "         НАВІГАТОР ПЕРЕХОДУ         ",
            "  Допомога ветеранам та демобілізованим",
            BANNER,
            "\nОберіть категорію ресурсів:",
            "1. Працевлаштування та Кар'єра",
            "2. Психологічна Підтримка",
            "3. Юридична Допомога",
            "4. Освіта та Навчання",
            "5. Соціальна Адаптація",
            "6. Додати новий ресурс",
            "0. Вийти з програми",
            RULE,
        ] {
            self.console.print_line(line)?;
        }
        Ok(())
    }

    fn category_menu(&mut self, category: Category) -> Result<()> {
        loop {
            self.console.clear()?;
            self.console
                .print_line(&format!("--- {} ---", category.title()))?;
            self.console.print_line("1. Переглянути всі ресурси")?;
            self.console
                .print_line("2. Знайти ресурс (за ключовим словом)")?;
            self.console.print_line("3. Повернутися до головного меню")?;
            self.console.print_line(RULE)?;

            match self.console.prompt_number::<u32>("Ваш вибір: ")? {
                1 => logged("view_resources", || self.view(category))?,
                2 => logged("search_resources", || self.search(category))?,
                3 => return Ok(()),
                _ => {
                    self.console.print_line("Невірний вибір. Спробуйте ще раз.")?;
                    self.console.pause()?;
                }
            }
        }
    }

    fn view(&mut self, category: Category) -> Result<()> {
        let title = category.title();
        self.console.clear()?;
        self.console.print_line(&format!("--- Всі {title} ---"))?;

        let resources = self.catalog.resources(category);
        if resources.is_empty() {
            self.console.print_line(&format!(
                "Наразі немає доступних {}.",
                title.to_lowercase()
            ))?;
        }
        for (index, resource) in resources.iter().enumerate() {
            self.console
                .print_line(&format!("\n--- Ресурс #{} ---", index + 1))?;
            self.console.print_line(&resource.to_text())?;
            self.console.print_line(SHORT_RULE)?;
        }
        self.console.pause()
    }

    fn search(&mut self, category: Category) -> Result<()> {
        let title = category.title().to_lowercase();
        self.console.clear()?;
        self.console
            .print_line(&format!("--- Пошук {} ---", category.title()))?;
        let keyword = self
            .console
            .read_line("Введіть ключове слово для пошуку: ")?
            .to_lowercase();

        let found = self.catalog.search(category, &keyword);
        info!(category = category.key(), matches = found.len(), "search finished");
        if found.is_empty() {
            self.console
                .print_line(&format!("Не знайдено {title} за запитом '{keyword}'."))?;
        } else {
            self.console.print_line(&format!(
                "\nЗнайдено {} {title} за запитом '{keyword}':",
                found.len()
            ))?;
            for (index, resource) in found.iter().enumerate() {
                self.console
                    .print_line(&format!("\n--- Знайдений ресурс #{} ---", index + 1))?;
                self.console.print_line(&resource.to_text())?;
                self.console.print_line(SHORT_RULE)?;
            }
        }
        self.console.pause()
    }

    fn add_menu(&mut self) -> Result<()> {
        self.console.clear()?;
        for line in [
            "--- Додати Новий Ресурс ---",
            "1. Вакансію",
            "2. Контакт психолога",
            "3. Юридичну допомогу",
            "4. Освітню програму",
            "5. Соціальну групу",
            "0. Повернутися до головного меню",
            RULE,
        ] {
            self.console.print_line(line)?;
        }

        match self.console.prompt_number::<u32>("Ваш вибір: ")? {
            0 => Ok(()),
            choice @ 1..=5 => {
                let kind = ResourceKind::ALL[(choice - 1) as usize];
                logged(add_operation(kind), || self.add_resource(kind))
            }
            _ => {
                self.console.print_line("Невірний вибір. Спробуйте ще раз.")?;
                self.console.pause()
            }
        }
    }

    fn add_resource(&mut self, kind: ResourceKind) -> Result<()> {
        self.console.clear()?;
        let resource = match kind {
            ResourceKind::JobPosting => match self.read_job()? {
                Some(job) => Resource::from(job),
                None => return Ok(()),
            },
            ResourceKind::PsychologistContact => self.read_psychologist()?.into(),
            ResourceKind::LegalAid => self.read_legal_aid()?.into(),
            ResourceKind::EducationProgram => self.read_education()?.into(),
            ResourceKind::SocialGroup => self.read_social_group()?.into(),
        };

        match self.catalog.add(resource) {
            Ok(category) => {
                info!(category = category.key(), kind = %kind, "resource added");
                self.console.print_line(success_message(kind))?;
                self.console.pause()?;
                self.persist();
                Ok(())
            }
            Err(err @ CatalogError::DuplicateJob { .. }) => {
                warn!("rejected resource: {err}");
                self.reject_duplicate_job()
            }
        }
    }

    /// Prompt for a job posting. Returns `None` when the title/company pair is already listed.
    fn read_job(&mut self) -> Result<Option<JobPosting>> {
        self.console.print_line("--- Додати Нову Вакансію ---")?;
        let title = self.console.read_line("Назва вакансії: ")?;
        let company = self.console.read_line("Компанія: ")?;
        if self.catalog.has_job(&title, &company) {
            self.reject_duplicate_job()?;
            return Ok(None);
        }

        let description = self.console.read_line("Опис вакансії: ")?;
        let requirements = self
            .console
            .read_line("Вимоги (через кому, наприклад: досвід, освіта): ")?;
        let contact = self.console.read_line("Контактна інформація: ")?;
        Ok(Some(JobPosting {
            title,
            company,
            description,
            requirements: JobPosting::parse_requirements(&requirements),
            contact,
        }))
    }

    fn read_psychologist(&mut self) -> Result<PsychologistContact> {
        self.console.print_line("--- Додати Контакт Психолога ---")?;
        Ok(PsychologistContact {
            name: self.console.read_line("Ім'я психолога: ")?,
            specialization: self.console.read_line("Спеціалізація: ")?,
            contact: self
                .console
                .read_line("Контактна інформація (телефон, email): ")?,
            schedule: self
                .console
                .read_line("Графік роботи (наприклад, Пн-Пт 9:00-18:00): ")?,
        })
    }

    fn read_legal_aid(&mut self) -> Result<LegalAid> {
        self.console.print_line("--- Додати Юридичну Допомогу ---")?;
        Ok(LegalAid {
            organization: self.console.read_line("Назва організації: ")?,
            service_type: self
                .console
                .read_line("Тип послуги (наприклад, консультація, представництво): ")?,
            contact: self.console.read_line("Контактна інформація: ")?,
            description: self.console.read_line("Опис послуги: ")?,
        })
    }

    fn read_education(&mut self) -> Result<EducationProgram> {
        self.console.print_line("--- Додати Освітню Програму ---")?;
        Ok(EducationProgram {
            name: self.console.read_line("Назва програми: ")?,
            institution: self.console.read_line("Навчальний заклад: ")?,
            duration: self
                .console
                .read_line("Тривалість (наприклад, 6 місяців): ")?,
            description: self.console.read_line("Опис програми: ")?,
            contact: self.console.read_line("Контактна інформація: ")?,
        })
    }

    fn read_social_group(&mut self) -> Result<SocialGroup> {
        self.console.print_line("--- Додати Соціальну Групу ---")?;
        Ok(SocialGroup {
            name: self.console.read_line("Назва групи: ")?,
            focus_area: self
                .console
                .read_line("Напрямок діяльності (наприклад, підтримка, хобі): ")?,
            location: self.console.read_line("Місце проведення/онлайн: ")?,
            contact: self.console.read_line("Контактна інформація: ")?,
            description: self.console.read_line("Опис групи: ")?,
        })
    }

    fn reject_duplicate_job(&mut self) -> Result<()> {
        self.console
            .print_line("\nПомилка: Вакансія з такою назвою та компанією вже існує.")?;
        self.console.pause()
    }

    /// Write all five categories. Failures are reported; the in-memory catalog is kept.
    fn persist(&mut self) -> Option<anyhow::Error> {
        print_or_log(&mut self.console, "Збереження всіх даних...");
        let mut failed = Vec::new();
        for (category, outcome) in self.store.save_each(&self.catalog) {
            let message = match outcome {
                Ok(()) => format!("Дані для '{}' збережено успішно.", category.key()),
                Err(err) => {
                    failed.push(category.key());
                    format!(
                        "Помилка при збереженні даних у '{}': {err:#}",
                        category.file_name()
                    )
                }
            };
            print_or_log(&mut self.console, &message);
        }

        if failed.is_empty() {
            return None;
        }
        print_or_log(&mut self.console, "Зміни залишаються в пам'яті.");
        Some(anyhow!("failed to save {}", failed.join(", ")))
    }

    fn save_on_exit(&mut self) -> Result<()> {
        loop {
            let Some(err) = self.persist() else {
                return Ok(());
            };
            match self.console.confirm("Повторити збереження? (т/н): ") {
                Ok(true) => continue,
                Ok(false) => {}
                Err(confirm_err) if is_input_closed(&confirm_err) => {}
                Err(confirm_err) => return Err(confirm_err),
            }
            return Err(err.context("catalog changes were not saved"));
        }
    }
}

fn report_load<C: Console>(
    console: &mut C,
    store: &CatalogStore,
    category: Category,
    report: &ResourceLoad,
) -> Result<()> {
    let path = store.path(category);
    if let Some(err) = &report.failure {
        console.print_line(&format!(
            "Помилка декодування JSON у файлі {}: {err:#}",
            path.display()
        ))?;
        if let Some(copy) = &report.quarantined {
            console.print_line(&format!("Копію файлу збережено як {}", copy.display()))?;
        }
        return Ok(());
    }
    for skipped in &report.skipped {
        console.print_line(&format!(
            "Попередження: пропущено запис #{} у файлі {}: {}",
            skipped.index + 1,
            path.display(),
            skipped.error
        ))?;
    }
    console.print_line(&format!(
        "Дані для '{}' завантажено успішно.",
        category.key()
    ))
}

fn add_operation(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::JobPosting => "add_job_posting",
        ResourceKind::PsychologistContact => "add_psychologist_contact",
        ResourceKind::LegalAid => "add_legal_aid",
        ResourceKind::EducationProgram => "add_education_program",
        ResourceKind::SocialGroup => "add_social_group",
    }
}

fn success_message(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::JobPosting => "Вакансію успішно додано!",
        ResourceKind::PsychologistContact => "Контакт психолога успішно додано!",
        ResourceKind::LegalAid => "Юридичну допомогу успішно додано!",
        ResourceKind::EducationProgram => "Освітню програму успішно додано!",
        ResourceKind::SocialGroup => "Соціальну групу успішно додано!",
    }
}
