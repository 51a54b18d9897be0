//! Authored site content. Everything here is built once by
//! [`Catalog::load`] and never mutated afterwards.

use std::fmt;

use serde::Serialize;

use crate::nav::{Icon, NavError, NavLink, NavList};
use crate::route::PageKind;
use crate::step::{Step, StepError, StepList};

#[derive(Debug)]
pub enum ContentError {
    Steps(&'static str, StepError),
    Nav(NavError),
}

impl fmt::Display for ContentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentError::Steps(guide, e) => write!(f, "Guide {}: {}", guide, e),
            ContentError::Nav(e) => write!(f, "Navigation error: {}", e),
        }
    }
}

impl std::error::Error for ContentError {}

impl From<NavError> for ContentError {
    fn from(value: NavError) -> Self {
        ContentError::Nav(value)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", content = "href", rename_all = "lowercase")]
pub enum Target {
    /// The configured project repository.
    Repository,
    Internal(String),
    External(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct Action {
    pub label: String,
    pub glyph: Option<&'static str>,
    pub target: Target,
}

impl Action {
    fn new(label: &str, icon: Option<Icon>, target: Target) -> Self {
        Self {
            label: label.to_string(),
            glyph: icon.map(|i| i.glyph()),
            target,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Chip {
    pub glyph: &'static str,
    pub label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HeroTitle {
    pub lead: String,
    pub accent: String,
    pub tail: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CallToAction {
    pub title: String,
    pub body: String,
    pub actions: Vec<Action>,
}

/// A step-by-step page: hero banner over a list of step cards.
#[derive(Debug, Clone, Serialize)]
pub struct Guide {
    pub slug: &'static str,
    pub path: &'static str,
    #[serde(skip)]
    pub page: PageKind,
    pub badge_glyph: &'static str,
    pub badge: String,
    pub title: HeroTitle,
    pub summary: String,
    pub primary_action: Option<Action>,
    pub chips: Vec<Chip>,
    pub steps: StepList,
    pub cta: Option<CallToAction>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Library {
    pub name: String,
    pub url: String,
    pub glyph: &'static str,
    pub description: String,
    pub best_for: String,
    pub install: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionStatus {
    Available,
    ComingSoon,
}

/// A copyable UI section shown in the component gallery.
#[derive(Debug, Clone, Serialize)]
pub struct Section {
    pub slug: &'static str,
    pub label: String,
    pub title: String,
    pub status: SectionStatus,
    pub language: String,
    pub source: String,
}

impl Section {
    pub fn path(&self) -> String {
        format!("/sections/{}", self.slug)
    }

    /// The section source as a single copyable step.
    pub fn as_step(&self) -> Step {
        Step::new(self.slug, "", &self.title)
            .source(&format!("{}.jsx", self.slug), &self.language)
            .code(&self.source)
    }
}

pub struct Catalog {
    guides: Vec<Guide>,
    libraries: Vec<Library>,
    sections: Vec<Section>,
    filter_nav: NavList,
    primary_nav: NavList,
}

impl Catalog {
    pub fn load() -> Result<Self, ContentError> {
        Ok(Self {
            guides: vec![
                setup_guide()?,
                git_workflow_guide()?,
                git_reset_guide()?,
                hosting_guide()?,
                schema_seed_guide()?,
            ],
            libraries: libraries(),
            sections: sections(),
            filter_nav: filter_nav()?,
            primary_nav: primary_nav()?,
        })
    }

    pub fn guides(&self) -> &[Guide] {
        &self.guides
    }

    pub fn guide(&self, page: PageKind) -> Option<&Guide> {
        self.guides.iter().find(|g| g.page == page)
    }

    pub fn libraries(&self) -> &[Library] {
        &self.libraries
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, slug: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.slug == slug)
    }

    /// The section whose page lives at `path`.
    pub fn section_at(&self, path: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.path() == path)
    }

    pub fn filter_nav(&self) -> &NavList {
        &self.filter_nav
    }

    pub fn primary_nav(&self) -> &NavList {
        &self.primary_nav
    }
}

fn chip(icon: Icon, label: &str) -> Chip {
    Chip {
        glyph: icon.glyph(),
        label: label.to_string(),
    }
}

fn title(lead: &str, accent: &str, tail: &str) -> HeroTitle {
    HeroTitle {
        lead: lead.to_string(),
        accent: accent.to_string(),
        tail: tail.to_string(),
    }
}

fn steps(guide: &'static str, steps: Vec<Step>) -> Result<StepList, ContentError> {
    StepList::new(steps).map_err(|e| ContentError::Steps(guide, e))
}

fn filter_nav() -> Result<NavList, NavError> {
    NavList::new(vec![
        NavLink::new("Shadcn Setup", "/setup").with_icon(Icon::LayoutTemplate),
        NavLink::new("Libraries", "/libraries").with_icon(Icon::BookOpen),
        NavLink::new("Git Workflow", "/git").with_icon(Icon::GitBranch),
        NavLink::new("Reset Git", "/git/reset").with_icon(Icon::RefreshCw),
        NavLink::new("Github Hosting", "/git/hosting").with_icon(Icon::Cloud),
        NavLink::new("Prisma DB", "/prisma").with_icon(Icon::Database),
        NavLink::new("Components", "/components").with_icon(Icon::Layers),
    ])
}

fn primary_nav() -> Result<NavList, NavError> {
    NavList::new(vec![
        NavLink::new("Setup Steps", "/setup"),
        NavLink::new("Docs", "/libraries"),
        NavLink::new("Components", "/components"),
    ])
}

fn setup_guide() -> Result<Guide, ContentError> {
    Ok(Guide {
        slug: "setup",
        path: "/setup",
        page: PageKind::Setup,
        badge_glyph: Icon::Zap.glyph(),
        badge: "TAILWIND V4 + REACT 19".to_string(),
        title: title("Modern", "JS", "Stack"),
        summary: "The professional setup for building high-speed React applications with Tailwind v4 and Shadcn components.".to_string(),
        primary_action: Some(Action::new("Go to Repository", Some(Icon::Github), Target::Repository)),
        chips: vec![chip(Icon::Code, "JS VERSION"), chip(Icon::Rocket, "VITE 6")],
        steps: steps("setup", vec![
            Step::new("step-1", "01", "Create Vite Project")
                .description("Scaffold a React environment using Vite. We use the vanilla JavaScript template for this setup.")
                .code("npm create vite@latest my-app -- --template react\ncd my-app\nnpm install"),
            Step::new("step-2", "02", "Install Tailwind v4")
                .description("Install the latest Tailwind CSS. Version 4 is high-performance and uses a simplified engine.")
                .code("npm install tailwindcss @tailwindcss/vite"),
            Step::new("step-3", "03", "Vite Plugin Config")
                .source("vite.config.js", "javascript")
                .description("Configure the Tailwind v4 Vite plugin and set up the `@` path alias for your source folder.")
                .code(r#"import { defineConfig } from 'vite'
import react from '@vitejs/plugin-react'
import tailwindcss from '@tailwindcss/vite'
import path from 'path'

export default defineConfig({
  plugins: [react(), tailwindcss()],
  resolve: {
    alias: {
      "@": path.resolve(__dirname, "./src"),
    },
  },
})"#),
            Step::new("step-4", "04", "JS Config Resolution")
                .source("jsconfig.json", "json")
                .description("Crucial for VS Code IntelliSense. This allows your editor to understand the `@` import path.")
                .code(r#"{
  "compilerOptions": {
    "baseUrl": ".",
    "paths": {
      "@/*": ["./src/*"]
    }
  }
}"#),
            Step::new("step-5", "05", "Initialize Shadcn")
                .description("Initialize the Shadcn UI CLI. This creates your `components.json` and global styles.")
                .code("npx shadcn@latest init"),
            Step::new("step-6", "06", "Install Components")
                .description("Add specific components to your project. These will be added to your `@/components/ui` folder.")
                .code("npx shadcn@latest add button card input accordion"),
            Step::new("step-7", "07", "Usage Example")
                .source("App.jsx", "jsx")
                .description("Now you can import and use your components using the clean `@` alias.")
                .code(r#"import { Button } from "@/components/ui/button"

export default function App() {
  return (
    <Button variant="outline">Click Me</Button>
  )
}"#),
        ])?,
        cta: Some(CallToAction {
            title: "Launch Environment".to_string(),
            body: "Ready to start? Visit the GitHub repository to clone the full template or explore the documentation.".to_string(),
            actions: vec![
                Action::new("View on GitHub", None, Target::Repository),
                Action::new("Browse UI Components", None, Target::Internal("/components".to_string())),
            ],
        }),
    })
}

fn git_workflow_guide() -> Result<Guide, ContentError> {
    Ok(Guide {
        slug: "git",
        path: "/git",
        page: PageKind::GitWorkflow,
        badge_glyph: Icon::RefreshCw.glyph(),
        badge: "GIT RESET PROTOCOL".to_string(),
        title: title("New", "Repo", "Launch"),
        summary: "Step-by-step guide to purging local Git history and migrating your MERN project to a fresh GitHub repository.".to_string(),
        primary_action: Some(Action::new(
            "Create New Repo",
            Some(Icon::Github),
            Target::External("https://github.com/new".to_string()),
        )),
        chips: vec![chip(Icon::Code, "WINDOWS CLI"), chip(Icon::Rocket, "MERN STACK")],
        steps: steps("git", vec![
            Step::new("step-1", "01", "Purge Git History")
                .source("powershell", "bash")
                .description("Completely disconnect the project from its previous history. This command deletes the hidden `.git` directory, effectively making the project \"git-less\" so you can start fresh.")
                .code("Remove-Item -Recurse -Force .git"),
            Step::new("step-2", "02", "Re-Initialize Repo")
                .source("powershell", "bash")
                .description("Create a brand new local Git repository. This generates a fresh `.git` folder without any of the old commit logs or remote origin links.")
                .code("git init\ngit add ."),
            Step::new("step-3", "03", "Establish Main Branch")
                .source("powershell", "bash")
                .description("Perform your first commit and rename the default branch to **main**. This is the standard naming convention for modern GitHub repositories.")
                .code("git commit -m \"Initial commit for new project\"\ngit branch -M main"),
            Step::new("step-4", "04", "Push to New Remote")
                .source("powershell", "bash")
                .description("Link your local project to your newly created GitHub repository and push your files. Make sure to replace the placeholder URL with your actual repo link.")
                .code("git remote add origin https://github.com/YOUR_USERNAME/YOUR_NEW_REPO.git\ngit push -u origin main"),
        ])?,
        cta: None,
    })
}

fn git_reset_guide() -> Result<Guide, ContentError> {
    Ok(Guide {
        slug: "git-reset",
        path: "/git/reset",
        page: PageKind::GitReset,
        badge_glyph: Icon::RefreshCw.glyph(),
        badge: "WINDOWS GIT MIGRATION".to_string(),
        title: title("Unlink", "&", "Rebuild"),
        summary: "Purge existing version history and re-initialize your MERN project for a new GitHub destination using PowerShell.".to_string(),
        primary_action: Some(Action::new(
            "Create New Repo",
            Some(Icon::Github),
            Target::External("https://github.com/new".to_string()),
        )),
        chips: vec![chip(Icon::Terminal, "LS -FORCE"), chip(Icon::RefreshCw, "RM -RECURSE")],
        steps: steps("git-reset", vec![
            Step::new("step-1", "01", "Locate Hidden Git Folder")
                .source("powershell", "bash")
                .description("Before deleting, verify the `.git` directory exists. It is a hidden system folder, so a plain `ls` won't show it. `-Force` reveals all hidden items in the current path.")
                .code("ls -Force"),
            Step::new("step-2", "02", "Remove Repository Link")
                .source("powershell", "bash")
                .description("Forcefully and recursively remove the `.git` directory. `-Recurse` deletes all sub-files and `-Force` bypasses read-only restrictions. The project is now a regular local folder.")
                .code("Remove-Item -Recurse -Force .git"),
            Step::new("step-3", "03", "Initialize Fresh Project")
                .source("powershell", "bash")
                .description("Restart version control from scratch. This creates a brand new `.git` folder and stages all current files for a clean initial commit.")
                .code("git init\ngit add ."),
            Step::new("step-4", "04", "Connect New GitHub Remote")
                .source("powershell", "bash")
                .description("Create a new repo on GitHub, then link it here. Rename the branch to **main** and push the code to the new destination.")
                .code("git commit -m \"Initial commit for new project\"\ngit branch -M main\ngit remote add origin <YOUR_NEW_URL>\ngit push -u origin main"),
        ])?,
        cta: None,
    })
}

fn hosting_guide() -> Result<Guide, ContentError> {
    Ok(Guide {
        slug: "hosting",
        path: "/git/hosting",
        page: PageKind::Hosting,
        badge_glyph: Icon::Cloud.glyph(),
        badge: "GITHUB PAGES DEPLOYMENT".to_string(),
        title: title("Build", "&", "Broadcast"),
        summary: "Compile your local React environment and ship it to the edge using GitHub Pages and Vite.".to_string(),
        primary_action: Some(Action::new("View Repository", Some(Icon::Github), Target::Repository)),
        chips: vec![chip(Icon::Terminal, "NPM RUN DEPLOY"), chip(Icon::Server, "GH-PAGES")],
        steps: steps("hosting", vec![
            Step::new("step-1", "01", "Inject Deploy Tool")
                .description("Install the `gh-pages` utility. It publishes the `dist` build folder directly to a branch on GitHub.")
                .code("npm install gh-pages --save-dev"),
            Step::new("step-2", "02", "Configure Base Path")
                .source("vite.config.js", "javascript")
                .description("Vite needs to know it is running in a sub-folder. Add a `base` property matching your repository name exactly so CSS and images load correctly.")
                .code(r#"import { defineConfig } from 'vite'
import react from '@vitejs/plugin-react-swc'

export default defineConfig({
  plugins: [react()],
  base: "/caseit/", // MUST match repo name
})"#),
            Step::new("step-3", "03", "Update Manifest")
                .source("package.json", "json")
                .description("Tell the deployer where the site will live (`homepage`) and add the scripts that build and upload the code.")
                .code(r#"{
  "name": "caseit",
  "homepage": "https://theaymanian2803.github.io/caseit",
  "scripts": {
    "dev": "vite",
    "build": "vite build",
    "predeploy": "npm run build",
    "deploy": "gh-pages -d dist"
  }
}"#),
            Step::new("step-4", "04", "Fix Router Scope")
                .source("src/App.tsx", "tsx")
                .description("React Router expects to be at the root domain. Since the site is served from `/caseit`, add the `basename` prop so the app understands its relative position.")
                .code(r#"import { BrowserRouter, Routes, Route } from "react-router-dom";

const App = () => (
  <BrowserRouter basename="/caseit">
    <Routes>
      <Route path="/" element={<Index />} />
      <Route path="*" element={<NotFound />} />
    </Routes>
  </BrowserRouter>
);"#),
            Step::new("step-5", "05", "Push & Ignite")
                .description("Commit the changes and run the deploy script. It builds the static files and sends them to the `gh-pages` branch.")
                .code("git add .\ngit commit -m \"Configured for deployment\"\ngit push\nnpm run deploy"),
        ])?,
        cta: None,
    })
}

fn schema_seed_guide() -> Result<Guide, ContentError> {
    Ok(Guide {
        slug: "prisma",
        path: "/prisma",
        page: PageKind::SchemaSeed,
        badge_glyph: Icon::Database.glyph(),
        badge: "PRISMA V7 STACK SETUP".to_string(),
        title: title("Schema", "&", "Seed"),
        summary: "Configure a Rust-free Prisma v7 environment with local generation and automated seeding for Next.js.".to_string(),
        primary_action: None,
        chips: vec![chip(Icon::Terminal, "NPM RUN DB:SEED"), chip(Icon::Server, "NEON DB")],
        steps: steps("prisma", vec![
            Step::new("step-1", "01", "Engine Core & Drivers")
                .description("Prisma v7 drops the native engine binary. Install the Prisma Client, the PG adapter and the PG driver itself.")
                .code("npm install @prisma/client @prisma/adapter-pg pg\nnpm install -D prisma tsx @types/pg"),
            Step::new("step-2", "02", "Model Definition")
                .source("prisma/schema.prisma", "prisma")
                .description("Define your data architecture. In v7 the `url` property is removed from the datasource block. A custom output path inside `lib` keeps the Next.js structure clean.")
                .code(r#"generator client {
  provider = "prisma-client"
  output   = "../lib/generated/prisma"
}

datasource db {
  provider = "postgresql"
}

model Product {
  id          String   @id @default(uuid())
  name        String
  description String
  price       Decimal
  createdAt   DateTime @default(now())
  updatedAt   DateTime @updatedAt
}"#),
            Step::new("step-3", "03", "Global Configuration")
                .source("prisma.config.ts", "typescript")
                .description("This file is now mandatory. It centralizes environment variables and seeding logic for the Prisma CLI.")
                .code(r#"import 'dotenv/config';
import { defineConfig, env } from 'prisma/config';

export default defineConfig({
  schema: 'prisma/schema.prisma',
  datasource: {
    url: env('DATABASE_URL'),
  },
  migrations: {
    path: 'prisma/migrations',
    seed: 'tsx db/seed.ts',
  },
});"#),
            Step::new("step-4", "04", "Singleton Adapter")
                .source("lib/prisma.ts", "typescript")
                .description("Instantiate the Prisma Client with the `PrismaPg` adapter so the JS runtime talks to Neon PostgreSQL without a native engine.")
                .code(r#"import { PrismaClient } from './generated/prisma/client';
import { PrismaPg } from '@prisma/adapter-pg';
import { Pool } from 'pg';

const connectionString = process.env.DATABASE_URL;
const pool = new Pool({ connectionString });
const adapter = new PrismaPg(pool);

const prismaClientSingleton = () => {
  return new PrismaClient({ adapter });
};

declare global {
  var prisma: undefined | ReturnType<typeof prismaClientSingleton>;
}

const prisma = globalThis.prisma ?? prismaClientSingleton();

export default prisma;
if (process.env.NODE_ENV !== 'production') globalThis.prisma = prisma;"#),
            Step::new("step-5", "05", "Data Seeding")
                .source("db/seed.ts", "typescript")
                .description("Reset the product table and inject fresh data using the singleton client from the `lib` directory.")
                .code(r#"import 'dotenv/config';
import prisma from '../lib/prisma';

async function main() {
  await prisma.product.deleteMany();
  await prisma.product.createMany({
    data: [
      { name: 'iPhone 15', description: 'Latest model', price: 999 },
      { name: 'Pixel 8', description: 'Google flagship', price: 799 }
    ]
  });
  console.log('Seeded successfully!');
}

main().catch(e => { console.error(e); process.exit(1); });"#),
            Step::new("step-6", "06", "Automated Scripts")
                .source("package.json", "json")
                .description("Map the workflow to NPM commands: generate the client, push schema changes and run the seeder.")
                .code(r#"{
  "scripts": {
    "postinstall": "prisma generate",
    "db:push": "prisma db push",
    "db:seed": "npx tsx ./db/seed.ts",
    "studio": "npx prisma studio"
  }
}"#),
        ])?,
        cta: None,
    })
}

fn libraries() -> Vec<Library> {
    let lib = |name: &str, url: &str, icon: Icon, description: &str, best_for: &str, install: &str| Library {
        name: name.to_string(),
        url: url.to_string(),
        glyph: icon.glyph(),
        description: description.to_string(),
        best_for: best_for.to_string(),
        install: install.to_string(),
    };

    vec![
        lib(
            "Framer Motion",
            "https://www.framer.com/motion/",
            Icon::Zap,
            "The standard for React animations. It uses a declarative syntax that feels incredibly \"React-like\".",
            "Complex layout transitions, gestures (drag/hover), and shared element animations.",
            "npm install framer-motion",
        ),
        lib(
            "GSAP",
            "https://gsap.com/resources/React/",
            Icon::Activity,
            "The heavy lifter. A robust JavaScript toolset that creates high-performance, complex timeline animations.",
            "Scroll-triggered effects (ScrollTrigger) and orchestrating multi-step sequences.",
            "npm install @gsap/react gsap",
        ),
        lib(
            "React Spring",
            "https://www.react-spring.dev/",
            Icon::MousePointer,
            "Physics-based animation library. It calculates motion based on spring dynamics (tension, friction) rather than duration.",
            "Natural, fluid, organic feeling UI elements that react to user input.",
            "npm install @react-spring/web",
        ),
        lib(
            "AutoAnimate",
            "https://auto-animate.formkit.com/",
            Icon::Play,
            "Zero-config. A single line of code that automatically animates mounting, unmounting, and list reordering.",
            "Drop-in smooth transitions for lists, dropdowns, and accordions with zero effort.",
            "npm install @formkit/auto-animate",
        ),
        lib(
            "Lottie React",
            "https://lottiereact.com/",
            Icon::Layers,
            "Renders Adobe After Effects animations as JSON. Perfect for vector-based, high-fidelity illustrations.",
            "Displaying complex brand animations, loading spinners, or detailed illustrations.",
            "npm install lottie-react",
        ),
    ]
}

fn sections() -> Vec<Section> {
    vec![
        Section {
            slug: "sectionone",
            label: "Hero Component".to_string(),
            title: "Product Showcase".to_string(),
            status: SectionStatus::Available,
            language: "jsx".to_string(),
            source: PRODUCT_SHOWCASE_SOURCE.to_string(),
        },
        Section {
            slug: "sectionstwo",
            label: "Section Two".to_string(),
            title: "Section Two".to_string(),
            status: SectionStatus::ComingSoon,
            language: "jsx".to_string(),
            source: String::new(),
        },
    ]
}

const PRODUCT_SHOWCASE_SOURCE: &str = r#"import { motion, useInView } from 'framer-motion'
import { useRef } from 'react'

const ProductShowcase = () => {
  const ref = useRef(null)
  const isInView = useInView(ref, { once: true, margin: '-10% 0px' })

  const fadeUpVariants = {
    hidden: { opacity: 0, y: 30 },
    visible: { opacity: 1, y: 0, transition: { duration: 0.8, ease: [0.22, 1, 0.36, 1] } },
  }

  return (
    <section ref={ref} className="relative min-h-screen flex items-center bg-neutral-950 py-24 text-white">
      <motion.div variants={fadeUpVariants} initial="hidden" animate={isInView ? 'visible' : 'hidden'}>
        <span className="text-orange-500 font-bold tracking-[0.2em] text-xs uppercase">New Arrival</span>
        <h2 className="text-5xl md:text-7xl font-bold tracking-tight mb-6">
          PURE <br />
          <span className="text-transparent bg-clip-text bg-gradient-to-r from-orange-400 to-red-600">PRECISION</span>
        </h2>
        <p className="text-neutral-400 text-lg leading-relaxed max-w-xl mb-10">
          Experience the perfect balance of performance and portability.
        </p>
        <button className="bg-gradient-to-r from-orange-500 to-red-600 text-white px-8 py-4 rounded-full font-semibold">
          Pre-Order Now
        </button>
      </motion.div>
    </section>
  )
}
export default ProductShowcase"#;
